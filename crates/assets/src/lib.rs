#![warn(missing_docs)]
//! Recipe pack schema, loading, and lookup.

mod loader;
mod recipe_registry;

pub use loader::{recipes_from_file, recipes_from_str};
pub use recipe_registry::{parse_item_key, RecipeRegistry, RecipeResolver};

use mdminecraft_core::{Ingredient, Recipe, RecipeError, RecipeResult};
use serde::Deserialize;
use thiserror::Error;

/// Recipe definition as authored in a recipe pack.
///
/// Either `in_shape` (rows of optional cells) or `ingredients` (shapeless)
/// must be present.
#[derive(Debug, Deserialize)]
pub struct RecipeDefinition {
    /// Produced item and amount per cycle.
    pub result: RecipeResult,
    /// Shaped layout, rows top to bottom.
    #[serde(default, alias = "inShape")]
    pub in_shape: Option<Vec<Vec<Option<Ingredient>>>>,
    /// Shapeless ingredient list.
    #[serde(default)]
    pub ingredients: Option<Vec<Ingredient>>,
}

impl RecipeDefinition {
    /// Convert into a validated [`Recipe`].
    pub fn into_recipe(self) -> Result<Recipe, AssetError> {
        let recipe = match (self.in_shape, self.ingredients) {
            (Some(shape), None) => Recipe::shaped(self.result, shape),
            (None, Some(ingredients)) => Recipe::shapeless(self.result, ingredients),
            (Some(_), Some(_)) => {
                return Err(AssetError::Ambiguous(self.result));
            }
            (None, None) => return Err(AssetError::InvalidRecipe(RecipeError::NoIngredients(
                self.result,
            ))),
        };
        recipe.validate()?;
        Ok(recipe)
    }
}

/// Errors emitted during recipe pack loading.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading packs.
    #[error("failed to read recipe pack: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse recipe pack: {0}")]
    Parse(#[from] serde_json::Error),
    /// A recipe failed validation.
    #[error("invalid recipe: {0}")]
    InvalidRecipe(#[from] RecipeError),
    /// A recipe declared both a shape and a shapeless ingredient list.
    #[error("recipe for {0} declares both in_shape and ingredients")]
    Ambiguous(RecipeResult),
}

/// Parse a JSON string into a list of recipe definitions.
pub fn load_recipes_from_str(input: &str) -> Result<Vec<RecipeDefinition>, AssetError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaped_definition_converts() {
        let defs = load_recipes_from_str(
            r#"[{ "result": {"id": 50, "count": 4}, "inShape": [[{"id": 5}], [{"id": 280}]] }]"#,
        )
        .unwrap();
        let recipe = defs.into_iter().next().unwrap().into_recipe().unwrap();
        assert_eq!(recipe.result().amount, 4);
        assert_eq!(recipe.height(), 2);
        assert!(!recipe.is_shapeless());
    }

    #[test]
    fn shapeless_definition_converts() {
        let defs = load_recipes_from_str(
            r#"[{ "result": {"id": 5, "amount": 4}, "ingredients": [{"id": 17}] }]"#,
        )
        .unwrap();
        let recipe = defs.into_iter().next().unwrap().into_recipe().unwrap();
        assert!(recipe.is_shapeless());
    }

    #[test]
    fn definition_without_ingredients_is_rejected() {
        let defs = load_recipes_from_str(r#"[{ "result": {"id": 5, "amount": 4} }]"#).unwrap();
        let err = defs.into_iter().next().unwrap().into_recipe().unwrap_err();
        assert!(matches!(
            err,
            AssetError::InvalidRecipe(RecipeError::NoIngredients(_))
        ));
    }

    #[test]
    fn definition_with_both_layouts_is_rejected() {
        let defs = load_recipes_from_str(
            r#"[{ "result": {"id": 5, "amount": 4}, "in_shape": [[{"id": 17}]], "ingredients": [{"id": 17}] }]"#,
        )
        .unwrap();
        let err = defs.into_iter().next().unwrap().into_recipe().unwrap_err();
        assert!(matches!(err, AssetError::Ambiguous(_)));
    }
}
