//! Validation and planning of a craft request.
//!
//! Planning only reads the inventory. A request that fails here leaves the
//! window untouched.

use crate::error::CraftError;
use crate::placement::{self, Placements};
use mdminecraft_assets::RecipeResolver;
use mdminecraft_core::{ItemKey, Recipe};
use mdminecraft_inventory::{InventoryFacade, SlotRef, WindowInfo};
use tracing::{debug, instrument};

/// What to craft: an item looked up through the resolver, or an explicit recipe.
#[derive(Debug, Clone, PartialEq)]
pub enum CraftTarget {
    /// Resolve a recipe for this item.
    Item(ItemKey),
    /// Use this recipe as-is.
    Recipe(Recipe),
}

impl CraftTarget {
    /// The item this target produces.
    pub fn key(&self) -> ItemKey {
        match self {
            CraftTarget::Item(key) => *key,
            CraftTarget::Recipe(recipe) => recipe.result().key(),
        }
    }

    /// The recipe to craft, if one exists.
    pub fn resolve(&self, resolver: &dyn RecipeResolver) -> Option<Recipe> {
        match self {
            CraftTarget::Item(key) => resolver.find_recipe(key.id, key.meta),
            CraftTarget::Recipe(recipe) => Some(recipe.clone()),
        }
    }
}

/// The crafting grid as a row-major `width x height` matrix of slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    width: usize,
    height: usize,
    slots: Vec<SlotRef>,
}

impl GridLayout {
    /// Derive the layout from the window's grid slots; only 2x2 and 3x3 exist.
    pub fn from_slots(slots: &[SlotRef]) -> Result<Self, CraftError> {
        let width = match slots.len() {
            4 => 2,
            9 => 3,
            other => return Err(CraftError::UnsupportedGridSize(other)),
        };
        Ok(Self {
            width,
            height: width,
            slots: slots.to_vec(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn slots(&self) -> &[SlotRef] {
        &self.slots
    }

    /// Slot at shape position `(x, y)`, anchored at the grid's top-left corner.
    pub fn slot_at(&self, x: usize, y: usize) -> Option<SlotRef> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.slots.get(x + y * self.width).copied()
    }

    /// Whether a recipe's shape fits without clipping.
    pub fn fits(&self, recipe: &Recipe) -> bool {
        recipe.width() <= self.width && recipe.height() <= self.height
    }
}

/// A validated craft, ready for the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    recipe: Recipe,
    amount: u32,
    craft_times: u32,
    grid: GridLayout,
    result_slot: SlotRef,
    storage: Vec<SlotRef>,
    placements: Placements,
    total_needs: Vec<(ItemKey, u32)>,
}

impl Plan {
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Requested number of result items.
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// How many times the recipe is executed.
    pub fn craft_times(&self) -> u32 {
        self.craft_times
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    pub fn result_slot(&self) -> SlotRef {
        self.result_slot
    }

    /// Slots ingredients are taken from.
    pub fn storage(&self) -> &[SlotRef] {
        &self.storage
    }

    pub fn placements(&self) -> &Placements {
        &self.placements
    }

    /// Items of each ingredient consumed over all cycles.
    pub fn total_needs(&self) -> &[(ItemKey, u32)] {
        &self.total_needs
    }

    /// Result items produced if every cycle succeeds; at least `amount`.
    pub fn expected_output(&self) -> u32 {
        self.recipe
            .result()
            .amount
            .saturating_mul(self.craft_times)
    }
}

/// Cycles needed to produce at least `amount` items, `per_cycle` at a time.
pub fn craft_times(amount: u32, per_cycle: u32) -> u32 {
    amount.div_ceil(per_cycle.max(1))
}

/// Resolve `target` and plan it.
pub fn plan(
    target: &CraftTarget,
    resolver: &dyn RecipeResolver,
    amount: i64,
    inventory: &dyn InventoryFacade,
) -> Result<Plan, CraftError> {
    let recipe = target
        .resolve(resolver)
        .ok_or_else(|| CraftError::NoRecipe(target.key()))?;
    plan_recipe(&recipe, amount, &inventory.window(), inventory)
}

/// Validate `recipe` against the open window and stored ingredients.
///
/// Checks run in a fixed order so the first failing condition is reported:
/// amount, window capability, grid size, recipe size, stored ingredients.
#[instrument(skip_all, fields(result = %recipe.result(), amount = amount, window = %window.kind))]
pub fn plan_recipe(
    recipe: &Recipe,
    amount: i64,
    window: &WindowInfo,
    inventory: &dyn InventoryFacade,
) -> Result<Plan, CraftError> {
    let amount = match u32::try_from(amount) {
        Ok(amount) if amount > 0 => amount,
        _ => return Err(CraftError::InvalidAmount(amount)),
    };

    let crafting = window
        .as_crafting()
        .ok_or_else(|| CraftError::UnsupportedWindow(window.kind.clone()))?;
    let grid = GridLayout::from_slots(crafting.craft_grid_slots())?;

    if !grid.fits(recipe) {
        return Err(CraftError::RecipeTooLarge {
            result: *recipe.result(),
            width: grid.width(),
            height: grid.height(),
        });
    }

    let craft_times = craft_times(amount, recipe.result().amount);
    let storage = crafting.persistent_slots().to_vec();
    let total_needs = placement::total_needs(recipe, craft_times);
    for (ingredient, required) in &total_needs {
        let stored = inventory.total_stored(ingredient, &storage);
        if stored < *required {
            return Err(CraftError::InsufficientIngredients {
                ingredient: *ingredient,
                stored,
                required: *required,
            });
        }
    }

    debug!(craft_times, grid = grid.width(), "craft planned");
    Ok(Plan {
        recipe: recipe.clone(),
        amount,
        craft_times,
        result_slot: crafting.craft_result_slot(),
        placements: placement::placements(recipe),
        grid,
        storage,
        total_needs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdminecraft_core::{Ingredient, ItemStack, RecipeResult};
    use mdminecraft_inventory::{CraftingWindow, SimInventory, WindowKind};

    fn torch() -> Recipe {
        Recipe::shaped(
            RecipeResult::new(50, 0, 4),
            vec![
                vec![Some(Ingredient::any(5))],
                vec![Some(Ingredient::any(280))],
            ],
        )
    }

    fn stocked(window: WindowInfo) -> SimInventory {
        let inv = SimInventory::new(window);
        inv.give(ItemStack::new(5, 0, 3));
        inv.give(ItemStack::new(280, 0, 3));
        inv
    }

    #[test]
    fn craft_times_rounds_up() {
        assert_eq!(craft_times(1, 4), 1);
        assert_eq!(craft_times(4, 4), 1);
        assert_eq!(craft_times(5, 4), 2);
        assert_eq!(craft_times(7, 1), 7);
    }

    #[test]
    fn grid_layout_is_row_major() {
        let slots: Vec<_> = (1..=9).map(SlotRef).collect();
        let grid = GridLayout::from_slots(&slots).unwrap();
        assert_eq!(grid.slot_at(0, 0), Some(SlotRef(1)));
        assert_eq!(grid.slot_at(2, 0), Some(SlotRef(3)));
        assert_eq!(grid.slot_at(0, 1), Some(SlotRef(4)));
        assert_eq!(grid.slot_at(3, 0), None);

        let small = GridLayout::from_slots(&slots[..4]).unwrap();
        assert_eq!(small.slot_at(1, 1), Some(SlotRef(4)));
        assert_eq!(
            GridLayout::from_slots(&slots[..6]),
            Err(CraftError::UnsupportedGridSize(6))
        );
    }

    #[test]
    fn plans_torches_in_player_window() {
        let inv = stocked(WindowInfo::player());
        let plan = plan_recipe(&torch(), 9, &inv.window(), &inv).unwrap();
        assert_eq!(plan.craft_times(), 3);
        assert_eq!(plan.expected_output(), 12);
        assert_eq!(plan.grid().width(), 2);
        assert_eq!(plan.result_slot(), SlotRef(0));
        assert_eq!(
            plan.total_needs(),
            &[(ItemKey::any(5), 3), (ItemKey::any(280), 3)]
        );
    }

    #[test]
    fn amount_is_checked_first() {
        let inv = SimInventory::new(WindowInfo::chest());
        assert_eq!(
            plan_recipe(&torch(), 0, &inv.window(), &inv),
            Err(CraftError::InvalidAmount(0))
        );
        assert_eq!(
            plan_recipe(&torch(), 1, &inv.window(), &inv),
            Err(CraftError::UnsupportedWindow(WindowKind::Chest))
        );
    }

    #[test]
    fn odd_grid_is_rejected() {
        let crafting = CraftingWindow::new(
            (1..=6).map(SlotRef).collect(),
            SlotRef(0),
            (7..20).map(SlotRef).collect(),
        );
        let window = WindowInfo::with_crafting(WindowKind::Other("Odd".into()), 20, crafting);
        let inv = SimInventory::new(window);
        assert_eq!(
            plan_recipe(&torch(), 1, &inv.window(), &inv),
            Err(CraftError::UnsupportedGridSize(6))
        );
    }

    #[test]
    fn three_wide_recipe_needs_a_table() {
        let p = Some(Ingredient::any(5));
        let slab = Recipe::shaped(RecipeResult::new(44, 2, 6), vec![vec![p, p, p]]);
        let inv = stocked(WindowInfo::player());
        assert_eq!(
            plan_recipe(&slab, 6, &inv.window(), &inv),
            Err(CraftError::RecipeTooLarge {
                result: RecipeResult::new(44, 2, 6),
                width: 2,
                height: 2,
            })
        );
    }

    #[test]
    fn shortfall_reports_first_missing_ingredient() {
        let inv = stocked(WindowInfo::crafting_table());
        let err = plan_recipe(&torch(), 16, &inv.window(), &inv).unwrap_err();
        assert_eq!(
            err,
            CraftError::InsufficientIngredients {
                ingredient: ItemKey::any(5),
                stored: 3,
                required: 4,
            }
        );
        assert!(inv.journal().is_empty());
    }

    #[test]
    fn unresolved_item_has_no_recipe() {
        let registry = mdminecraft_assets::RecipeRegistry::new(vec![torch()]);
        let inv = stocked(WindowInfo::crafting_table());
        let target = CraftTarget::Item(ItemKey::any(54));
        assert_eq!(
            plan(&target, &registry, 1, &inv),
            Err(CraftError::NoRecipe(ItemKey::any(54)))
        );
        let target = CraftTarget::Item(ItemKey::any(50));
        assert!(plan(&target, &registry, 1, &inv).is_ok());
    }
}
