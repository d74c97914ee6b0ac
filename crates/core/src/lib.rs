#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod crafting;
pub mod item;

// Re-export commonly used types
pub use crafting::{Ingredient, Recipe, RecipeError, RecipeResult, Shape, MAX_SHAPE_SIZE};
pub use item::{ItemId, ItemKey, ItemMeta, ItemStack, DEFAULT_STACK_SIZE};
