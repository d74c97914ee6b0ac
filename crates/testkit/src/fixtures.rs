//! Items, recipes and inventories shared by tests.

use mdminecraft_assets::RecipeRegistry;
use mdminecraft_core::{Ingredient, ItemId, ItemKey, ItemStack, Recipe, RecipeResult};
use mdminecraft_inventory::{InventoryFacade, SimInventory, SlotRef, WindowInfo};

/// Oak/spruce/... planks, variant per wood type.
pub const PLANKS: ItemId = 5;
/// Logs, variant per wood type.
pub const LOG: ItemId = 17;
/// Torch.
pub const TORCH: ItemId = 50;
/// Chest.
pub const CHEST: ItemId = 54;
/// Crafting table.
pub const CRAFTING_TABLE: ItemId = 58;
/// Coal (variant 0) and charcoal (variant 1).
pub const COAL: ItemId = 263;
/// Stick.
pub const STICK: ItemId = 280;

/// Coal over stick, four torches.
pub fn torch_recipe() -> Recipe {
    Recipe::shaped(
        RecipeResult::new(TORCH, 0, 4),
        vec![
            vec![Some(Ingredient::any(COAL))],
            vec![Some(Ingredient::any(STICK))],
        ],
    )
}

/// Plank over stick, four torches. Not a real recipe, but it keeps
/// end-to-end tests down to two ingredient kinds with wildcard matching.
pub fn plank_torch_recipe() -> Recipe {
    Recipe::shaped(
        RecipeResult::new(TORCH, 0, 4),
        vec![
            vec![Some(Ingredient::any(PLANKS))],
            vec![Some(Ingredient::any(STICK))],
        ],
    )
}

/// Two planks stacked, four sticks.
pub fn stick_recipe() -> Recipe {
    Recipe::shaped(
        RecipeResult::new(STICK, 0, 4),
        vec![
            vec![Some(Ingredient::any(PLANKS))],
            vec![Some(Ingredient::any(PLANKS))],
        ],
    )
}

/// One log of `variant`, four planks of the same variant.
pub fn planks_recipe(variant: u16) -> Recipe {
    Recipe::shapeless(
        RecipeResult::new(PLANKS, variant, 4),
        vec![Ingredient::exact(LOG, variant)],
    )
}

/// Ring of eight planks.
pub fn chest_recipe() -> Recipe {
    let p = Some(Ingredient::any(PLANKS));
    Recipe::shaped(
        RecipeResult::new(CHEST, 0, 1),
        vec![vec![p, p, p], vec![p, None, p], vec![p, p, p]],
    )
}

/// 2x2 planks.
pub fn crafting_table_recipe() -> Recipe {
    let p = Some(Ingredient::any(PLANKS));
    Recipe::shaped(
        RecipeResult::new(CRAFTING_TABLE, 0, 1),
        vec![vec![p, p], vec![p, p]],
    )
}

/// Every fixture recipe.
pub fn default_recipes() -> Vec<Recipe> {
    vec![
        torch_recipe(),
        stick_recipe(),
        planks_recipe(0),
        planks_recipe(1),
        chest_recipe(),
        crafting_table_recipe(),
    ]
}

/// Registry over [`default_recipes`].
pub fn default_registry() -> RecipeRegistry {
    RecipeRegistry::new(default_recipes())
}

/// A simulated window whose result slot follows [`default_recipes`] plus
/// `extra`, with `stacks` placed into storage.
pub fn seeded_inventory<I>(window: WindowInfo, extra: I, stacks: &[ItemStack]) -> SimInventory
where
    I: IntoIterator<Item = Recipe>,
{
    let inv = SimInventory::new(window)
        .with_recipes(default_recipes())
        .with_recipes(extra);
    for stack in stacks {
        inv.give(stack.clone());
    }
    inv
}

/// Crafting table with `planks` planks in slot 10 and `sticks` sticks in
/// slot 11, crafting torches from plank over stick.
pub fn torch_table(planks: u32, sticks: u32) -> SimInventory {
    let inv = SimInventory::new(WindowInfo::crafting_table()).with_recipes([plank_torch_recipe()]);
    if planks > 0 {
        inv.give(ItemStack::new(PLANKS, 0, planks));
    }
    if sticks > 0 {
        inv.give(ItemStack::new(STICK, 0, sticks));
    }
    inv
}

/// Contents of every slot in `slots`, for before/after comparisons.
pub fn snapshot(inv: &SimInventory, slots: &[SlotRef]) -> Vec<Option<ItemStack>> {
    slots.iter().map(|slot| inv.slot(*slot)).collect()
}

/// Snapshot of the whole window plus the cursor.
pub fn full_snapshot(inv: &SimInventory) -> (Vec<Option<ItemStack>>, Option<ItemStack>) {
    let slots: Vec<_> = (0..inv.window().slot_count).map(SlotRef).collect();
    (snapshot(inv, &slots), inv.cursor().stack)
}

/// Total of `id` (any variant) in storage.
pub fn stored_any(inv: &SimInventory, id: ItemId) -> u32 {
    inv.stored(&ItemKey::any(id))
}
