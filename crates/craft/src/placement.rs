//! Grid placement: where each ingredient goes, relative to the recipe shape.

use mdminecraft_core::{ItemKey, Recipe};

/// One grid cell to fill and the items it takes per craft cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Column inside the recipe shape.
    pub x: usize,
    /// Row inside the recipe shape.
    pub y: usize,
    /// Items placed here per cycle.
    pub amount: u32,
}

/// Cells grouped by ingredient, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placements {
    entries: Vec<(ItemKey, Vec<Cell>)>,
}

impl Placements {
    /// Iterate over `(ingredient, cells)` in fill order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &[Cell])> {
        self.entries
            .iter()
            .map(|(key, cells)| (key, cells.as_slice()))
    }

    /// Cells taking `ingredient`, if the recipe uses it.
    pub fn cells_for(&self, ingredient: &ItemKey) -> Option<&[Cell]> {
        self.entries
            .iter()
            .find(|(key, _)| key == ingredient)
            .map(|(_, cells)| cells.as_slice())
    }

    /// Number of distinct ingredients.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the recipe has no ingredients.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Map each ingredient of `recipe` to the shape cells it occupies.
///
/// Independent of how many times the recipe is crafted; the executor scales
/// each cell's amount by the repetition count.
pub fn placements(recipe: &Recipe) -> Placements {
    let mut entries: Vec<(ItemKey, Vec<Cell>)> = Vec::new();
    for (x, y, ingredient) in recipe.cells() {
        let cell = Cell {
            x,
            y,
            amount: ingredient.amount,
        };
        let key = ingredient.key();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, cells)) => cells.push(cell),
            None => entries.push((key, vec![cell])),
        }
    }
    Placements { entries }
}

/// Total items of each ingredient consumed by `craft_times` cycles.
pub fn total_needs(recipe: &Recipe, craft_times: u32) -> Vec<(ItemKey, u32)> {
    recipe
        .ingredient_amounts()
        .into_iter()
        .map(|(key, per_cycle)| (key, per_cycle.saturating_mul(craft_times)))
        .collect()
}
