//! Recipe registry for resolving crafting recipes loaded from JSON packs.

use mdminecraft_core::{ItemId, ItemKey, ItemMeta, Recipe};

/// Looks up the recipe that produces an item.
///
/// Implementations must be cheap to query; the crafter calls this once per
/// craft request.
pub trait RecipeResolver: Send + Sync {
    /// Find a recipe producing `id`, restricted to `meta` when given.
    fn find_recipe(&self, id: ItemId, meta: Option<ItemMeta>) -> Option<Recipe>;
}

/// Registry of crafting recipes in registration order.
#[derive(Debug, Clone, Default)]
pub struct RecipeRegistry {
    recipes: Vec<Recipe>,
}

impl RecipeRegistry {
    /// Create a new recipe registry from a list of recipes.
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// All recipes producing `id` (any variant), in registration order.
    pub fn recipes_for(&self, id: ItemId) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().filter(move |r| r.result().id == id)
    }

    /// Iterate over every registered recipe.
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Get the number of registered recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Find all recipes that can be crafted once with the stored items.
    pub fn craftable_recipes<F>(&self, stored: F) -> Vec<&Recipe>
    where
        F: Fn(&ItemKey) -> u32,
    {
        self.recipes
            .iter()
            .filter(|recipe| recipe.can_craft(&stored))
            .collect()
    }
}

impl RecipeResolver for RecipeRegistry {
    fn find_recipe(&self, id: ItemId, meta: Option<ItemMeta>) -> Option<Recipe> {
        self.recipes_for(id)
            .find(|recipe| meta.map_or(true, |m| recipe.result().meta == m))
            .cloned()
    }
}

/// Parse an item string into an [`ItemKey`].
///
/// Format:
/// - "50" -> any variant of item 50
/// - "50:*" -> any variant of item 50
/// - "35:14" -> item 35, variant 14
pub fn parse_item_key(s: &str) -> Option<ItemKey> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    match parts.as_slice() {
        [id] => id.parse::<ItemId>().ok().map(ItemKey::any),
        [id, "*"] => id.parse::<ItemId>().ok().map(ItemKey::any),
        [id, meta] => {
            let id = id.parse::<ItemId>().ok()?;
            let meta = meta.parse::<ItemMeta>().ok()?;
            Some(ItemKey::new(id, meta))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdminecraft_core::{Ingredient, RecipeResult};

    fn wool(color: ItemMeta) -> Recipe {
        Recipe::shapeless(
            RecipeResult::new(35, color, 1),
            vec![Ingredient::exact(351, color), Ingredient::exact(35, 0)],
        )
    }

    fn sticks() -> Recipe {
        Recipe::shaped(
            RecipeResult::new(280, 0, 4),
            vec![vec![Some(Ingredient::any(5))], vec![Some(Ingredient::any(5))]],
        )
    }

    #[test]
    fn test_recipe_registry_creation() {
        let registry = RecipeRegistry::new(vec![sticks()]);

        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        assert!(registry.find_recipe(280, None).is_some());
        assert!(registry.find_recipe(281, None).is_none());
    }

    #[test]
    fn test_recipe_lookup_by_variant() {
        let registry = RecipeRegistry::new(vec![wool(14), wool(11)]);

        let red = registry.find_recipe(35, Some(14)).unwrap();
        assert_eq!(red.result().meta, 14);
        let blue = registry.find_recipe(35, Some(11)).unwrap();
        assert_eq!(blue.result().meta, 11);
        assert!(registry.find_recipe(35, Some(3)).is_none());

        // Without a variant the first registered recipe wins.
        let any = registry.find_recipe(35, None).unwrap();
        assert_eq!(any.result().meta, 14);
        assert_eq!(registry.recipes_for(35).count(), 2);
    }

    #[test]
    fn test_craftable_recipes() {
        let planks = Recipe::shapeless(RecipeResult::new(5, 0, 4), vec![Ingredient::any(17)]);
        let registry = RecipeRegistry::new(vec![planks, sticks()]);

        // Logs only: planks craftable, sticks need two planks.
        let craftable = registry.craftable_recipes(|key| if key.id == 17 { 3 } else { 0 });
        assert_eq!(craftable.len(), 1);
        assert_eq!(craftable[0].result().id, 5);
    }

    #[test]
    fn test_parse_item_key() {
        assert_eq!(parse_item_key("50"), Some(ItemKey::any(50)));
        assert_eq!(parse_item_key("50:*"), Some(ItemKey::any(50)));
        assert_eq!(parse_item_key("35:14"), Some(ItemKey::new(35, 14)));
        assert_eq!(parse_item_key(" 5:0 "), Some(ItemKey::new(5, 0)));

        assert_eq!(parse_item_key("torch"), None);
        assert_eq!(parse_item_key("35:red"), None);
        assert_eq!(parse_item_key("1:2:3"), None);
        assert_eq!(parse_item_key("70000"), None);
    }
}
