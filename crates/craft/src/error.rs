//! Failure kinds of a craft request.

use mdminecraft_core::{ItemKey, RecipeResult};
use mdminecraft_inventory::{InventoryError, WindowKind};
use thiserror::Error;

/// Why a craft could not be planned or was aborted.
///
/// Planning failures are raised before any inventory manipulation and can be
/// retried with adjusted parameters. Everything else aborts a running task
/// and leaves whatever was already placed in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    /// No recipe produces the requested item.
    #[error("[Craft] No recipe for {0}")]
    NoRecipe(ItemKey),
    /// Requested amount is not a positive count.
    #[error("[Craft] Nothing to craft, amount={0}")]
    InvalidAmount(i64),
    /// The open window has no crafting grid.
    #[error("[Craft] {0} is no crafting window")]
    UnsupportedWindow(WindowKind),
    /// The crafting grid is neither 2x2 nor 3x3.
    #[error("[Craft] Crafting grid has unsupported size of {0} instead of 4 or 9")]
    UnsupportedGridSize(usize),
    /// The recipe shape is larger than the grid.
    #[error("[Craft] Recipe for {result} does not fit in a {width}x{height} grid")]
    RecipeTooLarge {
        /// Recipe output.
        result: RecipeResult,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
    /// Storage holds fewer items than the plan consumes.
    #[error("[Craft] Missing {ingredient} not stored, have {stored} of {required}")]
    InsufficientIngredients {
        /// Ingredient that ran short.
        ingredient: ItemKey,
        /// Amount found in storage.
        stored: u32,
        /// Amount the plan consumes.
        required: u32,
    },
    /// An ingredient vanished from storage after planning.
    #[error("[Craft] No {0} found in inventory")]
    MissingIngredientRace(ItemKey),
    /// The inventory rejected a manipulation.
    #[error("[Craft] Inventory operation failed: {0}")]
    Inventory(#[from] InventoryError),
    /// The task was aborted by its owner.
    #[error("[Craft] Task cancelled")]
    Cancelled,
}

impl CraftError {
    /// Whether the failure happened before any inventory manipulation.
    pub fn is_planning(&self) -> bool {
        matches!(
            self,
            CraftError::NoRecipe(_)
                | CraftError::InvalidAmount(_)
                | CraftError::UnsupportedWindow(_)
                | CraftError::UnsupportedGridSize(_)
                | CraftError::RecipeTooLarge { .. }
                | CraftError::InsufficientIngredients { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_item_and_quantities() {
        let err = CraftError::InsufficientIngredients {
            ingredient: ItemKey::any(280),
            stored: 4,
            required: 6,
        };
        assert_eq!(
            err.to_string(),
            "[Craft] Missing 280:* not stored, have 4 of 6"
        );

        let err = CraftError::RecipeTooLarge {
            result: RecipeResult::new(54, 0, 1),
            width: 2,
            height: 2,
        };
        assert_eq!(
            err.to_string(),
            "[Craft] Recipe for 54:0 x1 does not fit in a 2x2 grid"
        );

        let err = CraftError::UnsupportedWindow(WindowKind::Chest);
        assert_eq!(err.to_string(), "[Craft] ChestWindow is no crafting window");
    }

    #[test]
    fn planning_failures_are_classified() {
        assert!(CraftError::InvalidAmount(0).is_planning());
        assert!(CraftError::UnsupportedGridSize(6).is_planning());
        assert!(!CraftError::MissingIngredientRace(ItemKey::any(5)).is_planning());
        assert!(!CraftError::Cancelled.is_planning());
    }
}
