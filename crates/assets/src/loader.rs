use std::fs;
use std::path::Path;

use crate::AssetError;
use crate::RecipeRegistry;

/// Load a recipe registry from the provided JSON file path.
pub fn recipes_from_file(path: &Path) -> Result<RecipeRegistry, AssetError> {
    let data = fs::read_to_string(path)?;
    recipes_from_str(&data)
}

/// Load a recipe registry from an in-memory JSON string.
pub fn recipes_from_str(input: &str) -> Result<RecipeRegistry, AssetError> {
    let defs = crate::load_recipes_from_str(input)?;
    let recipes = defs
        .into_iter()
        .map(|def| def.into_recipe())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RecipeRegistry::new(recipes))
}
