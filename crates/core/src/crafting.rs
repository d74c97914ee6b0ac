//! Crafting system - Shaped and shapeless recipes for the crafting grid

use crate::item::{ItemId, ItemKey, ItemMeta};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Largest grid any recipe can target (crafting table).
pub const MAX_SHAPE_SIZE: usize = 3;

fn default_amount() -> u32 {
    1
}

/// A single ingredient cell of a recipe shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Item identifier.
    pub id: ItemId,
    /// Required variant, `None` accepts any variant.
    #[serde(default)]
    pub meta: Option<ItemMeta>,
    /// Items consumed from this cell per craft cycle.
    #[serde(default = "default_amount", alias = "count")]
    pub amount: u32,
}

impl Ingredient {
    /// One item of `id`, any variant.
    pub const fn any(id: ItemId) -> Self {
        Self {
            id,
            meta: None,
            amount: 1,
        }
    }

    /// One item of a concrete variant.
    pub const fn exact(id: ItemId, meta: ItemMeta) -> Self {
        Self {
            id,
            meta: Some(meta),
            amount: 1,
        }
    }

    /// Override the per-cycle amount.
    pub const fn times(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Key used to look this ingredient up in storage.
    pub fn key(&self) -> ItemKey {
        ItemKey {
            id: self.id,
            meta: self.meta,
        }
    }
}

/// Output of one craft cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeResult {
    /// Item identifier.
    pub id: ItemId,
    /// Variant of the produced item.
    #[serde(default)]
    pub meta: ItemMeta,
    /// Items produced per cycle.
    #[serde(alias = "count")]
    pub amount: u32,
}

impl RecipeResult {
    /// Create a result descriptor.
    pub const fn new(id: ItemId, meta: ItemMeta, amount: u32) -> Self {
        Self { id, meta, amount }
    }

    /// Concrete key of the produced item.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.id, self.meta)
    }
}

impl fmt::Display for RecipeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} x{}", self.id, self.meta, self.amount)
    }
}

/// Reasons a recipe definition is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// Result amount must be positive.
    #[error("recipe for {0} produces nothing")]
    EmptyResult(RecipeResult),
    /// Shape has no ingredient at all.
    #[error("recipe for {0} has no ingredients")]
    NoIngredients(RecipeResult),
    /// More rows than the largest grid.
    #[error("recipe for {result} has {rows} rows (max 3)")]
    TooManyRows {
        /// Recipe output.
        result: RecipeResult,
        /// Row count found.
        rows: usize,
    },
    /// A row wider than the largest grid.
    #[error("recipe for {result} has a row of {len} cells (max 3)")]
    RowTooLong {
        /// Recipe output.
        result: RecipeResult,
        /// Length of the offending row.
        len: usize,
    },
    /// An ingredient cell consuming zero items.
    #[error("recipe for {result} has a zero-amount ingredient at ({x}, {y})")]
    ZeroIngredient {
        /// Recipe output.
        result: RecipeResult,
        /// Column of the cell.
        x: usize,
        /// Row of the cell.
        y: usize,
    },
}

/// Input shape: rows of optional ingredient cells.
pub type Shape = Vec<Vec<Option<Ingredient>>>;

/// A crafting recipe mapping an ingredient shape to a result.
///
/// Recipes are immutable once built. Shapeless recipes are laid out into a
/// compact shape so every recipe can be placed the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    result: RecipeResult,
    in_shape: Shape,
    shapeless: bool,
}

impl Recipe {
    /// Build a shaped recipe from explicit rows.
    pub fn shaped(result: RecipeResult, in_shape: Shape) -> Self {
        Self {
            result,
            in_shape,
            shapeless: false,
        }
    }

    /// Build a shapeless recipe.
    ///
    /// Ingredients are laid out row-major, two per row when they fit the
    /// 2x2 player grid and three per row otherwise.
    pub fn shapeless(result: RecipeResult, ingredients: Vec<Ingredient>) -> Self {
        let width = if ingredients.len() <= 4 { 2 } else { MAX_SHAPE_SIZE };
        let in_shape = ingredients
            .chunks(width)
            .map(|row| row.iter().copied().map(Some).collect())
            .collect();
        Self {
            result,
            in_shape,
            shapeless: true,
        }
    }

    /// Output of one craft cycle.
    pub fn result(&self) -> &RecipeResult {
        &self.result
    }

    /// Rows of ingredient cells.
    pub fn in_shape(&self) -> &Shape {
        &self.in_shape
    }

    /// Whether the recipe was declared without a shape.
    pub fn is_shapeless(&self) -> bool {
        self.shapeless
    }

    /// Number of rows in the shape.
    pub fn height(&self) -> usize {
        self.in_shape.len()
    }

    /// Length of the longest row in the shape.
    pub fn width(&self) -> usize {
        self.in_shape.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Iterate over non-empty cells as `(x, y, ingredient)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Ingredient)> {
        self.in_shape.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.as_ref().map(|ingredient| (x, y, ingredient)))
        })
    }

    /// Per-cycle amount of each distinct ingredient, in order of first appearance.
    pub fn ingredient_amounts(&self) -> Vec<(ItemKey, u32)> {
        let mut totals: Vec<(ItemKey, u32)> = Vec::new();
        for (_, _, ingredient) in self.cells() {
            let key = ingredient.key();
            match totals.iter_mut().find(|(k, _)| *k == key) {
                Some((_, total)) => *total += ingredient.amount,
                None => totals.push((key, ingredient.amount)),
            }
        }
        totals
    }

    /// Check if one cycle can be crafted given a stored-amount lookup.
    pub fn can_craft<F>(&self, stored: F) -> bool
    where
        F: Fn(&ItemKey) -> u32,
    {
        self.ingredient_amounts()
            .iter()
            .all(|(key, needed)| stored(key) >= *needed)
    }

    /// Validate the recipe against grid limits.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.result.amount == 0 {
            return Err(RecipeError::EmptyResult(self.result));
        }
        if self.height() > MAX_SHAPE_SIZE {
            return Err(RecipeError::TooManyRows {
                result: self.result,
                rows: self.height(),
            });
        }
        if let Some(row) = self.in_shape.iter().find(|row| row.len() > MAX_SHAPE_SIZE) {
            return Err(RecipeError::RowTooLong {
                result: self.result,
                len: row.len(),
            });
        }
        if let Some((x, y, _)) = self.cells().find(|(_, _, i)| i.amount == 0) {
            return Err(RecipeError::ZeroIngredient {
                result: self.result,
                x,
                y,
            });
        }
        if self.cells().next().is_none() {
            return Err(RecipeError::NoIngredients(self.result));
        }
        Ok(())
    }
}
