use anyhow::{Context, Result};
use clap::ValueEnum;
use mdminecraft_assets::{recipes_from_file, recipes_from_str, RecipeRegistry};
use mdminecraft_core::ItemStack;
use mdminecraft_inventory::{SimInventory, SlotRef, WindowInfo};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config/autocraft.toml";
const DEFAULT_RECIPES: &str = include_str!("../config/recipes.json");

/// Window the simulated inventory shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WindowChoice {
    #[default]
    Player,
    CraftingTable,
    Chest,
}

impl WindowChoice {
    pub fn window(self) -> WindowInfo {
        match self {
            WindowChoice::Player => WindowInfo::player(),
            WindowChoice::CraftingTable => WindowInfo::crafting_table(),
            WindowChoice::Chest => WindowInfo::chest(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AutocraftConfig {
    /// Recipe pack (JSON). The built-in recipe book is used when unset.
    pub recipes: Option<PathBuf>,
    /// Starting inventory contents (JSON).
    pub inventory: Option<PathBuf>,
    pub window: WindowChoice,
    /// Simulated server acknowledgement latency per manipulation.
    pub ack_delay_ms: u64,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// JSONL file receiving every issued manipulation.
    pub journal: Option<PathBuf>,
}

impl Default for AutocraftConfig {
    fn default() -> Self {
        Self {
            recipes: None,
            inventory: None,
            window: WindowChoice::Player,
            ack_delay_ms: 0,
            log_filter: "info".to_string(),
            journal: None,
        }
    }
}

impl AutocraftConfig {
    /// Load configuration from an explicit path. Callers fall back to
    /// defaults on errors after logging them with [`Self::warn_fallback`].
    pub fn try_load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Log why defaults are used. A missing default config is expected.
    pub fn warn_fallback(path: &Path, err: &anyhow::Error) {
        let missing_default = path == Path::new(DEFAULT_CONFIG_PATH)
            && err
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
        if !missing_default {
            warn!("{err:#}. Using defaults");
        }
    }

    pub fn ack_delay(&self) -> Option<Duration> {
        (self.ack_delay_ms > 0).then(|| Duration::from_millis(self.ack_delay_ms))
    }

    /// Recipe registry from the configured pack, or the built-in book.
    ///
    /// Unlike the config file itself, a broken recipe pack is an error.
    pub fn recipe_registry(&self) -> Result<RecipeRegistry> {
        match &self.recipes {
            Some(path) => {
                let registry = recipes_from_file(path)
                    .with_context(|| format!("failed to load recipes from {}", path.display()))?;
                info!(count = registry.len(), "Loaded recipes from {}", path.display());
                Ok(registry)
            }
            None => default_recipe_registry(),
        }
    }

    /// Simulated inventory for the configured window, seeded from the
    /// inventory file if one is set.
    pub fn build_inventory(&self, registry: &RecipeRegistry) -> Result<SimInventory> {
        let mut inventory = SimInventory::new(self.window.window())
            .with_recipes(registry.iter().cloned());
        if let Some(delay) = self.ack_delay() {
            inventory = inventory.with_ack_delay(delay);
        }
        if let Some(path) = &self.inventory {
            let seed = load_inventory_seed(path)?;
            seed.apply(&inventory)?;
        }
        Ok(inventory)
    }
}

/// The recipe book compiled into the binary.
pub fn default_recipe_registry() -> Result<RecipeRegistry> {
    recipes_from_str(DEFAULT_RECIPES).context("built-in recipe book is invalid")
}

/// A stack placed into a specific slot, or into storage when `slot` is unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedEntry {
    #[serde(default)]
    pub slot: Option<usize>,
    #[serde(flatten)]
    pub stack: ItemStack,
}

/// Starting inventory contents.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct InventorySeed {
    pub entries: Vec<SeedEntry>,
}

impl InventorySeed {
    pub fn apply(&self, inventory: &SimInventory) -> Result<()> {
        for entry in &self.entries {
            match entry.slot {
                Some(slot) => inventory
                    .set_slot(SlotRef(slot), Some(entry.stack.clone()))
                    .with_context(|| format!("cannot seed slot {slot}"))?,
                None => {
                    if let Some(rest) = inventory.give(entry.stack.clone()) {
                        warn!(
                            item = %rest.key(),
                            count = rest.count,
                            "Storage full while seeding, dropping the rest"
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

pub fn load_inventory_seed(path: &Path) -> Result<InventorySeed> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read inventory seed {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse inventory seed {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdminecraft_core::ItemKey;
    use mdminecraft_inventory::InventoryFacade;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: AutocraftConfig =
            toml::from_str("window = \"crafting_table\"\nack_delay_ms = 5\n").unwrap();
        assert_eq!(cfg.window, WindowChoice::CraftingTable);
        assert_eq!(cfg.ack_delay(), Some(Duration::from_millis(5)));
        assert_eq!(cfg.log_filter, "info");
        assert!(cfg.recipes.is_none());
    }

    #[test]
    fn missing_file_is_reported_as_io_error() {
        let err = AutocraftConfig::try_load_from_path(Path::new("does/not/exist.toml")).unwrap_err();
        let io = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
        assert_eq!(AutocraftConfig::default().ack_delay(), None);
    }

    #[test]
    fn bundled_config_parses() {
        let cfg = AutocraftConfig::try_load_from_path(Path::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/config/autocraft.toml"
        )))
        .unwrap();
        assert_eq!(cfg.window, WindowChoice::CraftingTable);
        assert_eq!(cfg.recipes, Some(PathBuf::from("config/recipes.json")));
    }

    #[test]
    fn built_in_recipe_book_parses() {
        let registry = default_recipe_registry().unwrap();
        assert!(registry.recipes_for(50).next().is_some());
        assert!(registry.recipes_for(54).next().is_some());
    }

    #[test]
    fn seed_places_stacks() {
        let seed: InventorySeed = serde_json::from_str(
            r#"[{"slot": 12, "id": 5, "count": 3}, {"id": 280, "count": 2}]"#,
        )
        .unwrap();
        let inventory = SimInventory::new(WindowInfo::crafting_table());
        seed.apply(&inventory).unwrap();
        assert_eq!(inventory.slot(SlotRef(12)), Some(ItemStack::new(5, 0, 3)));
        assert_eq!(inventory.slot(SlotRef(10)), Some(ItemStack::new(280, 0, 2)));
        assert_eq!(
            inventory.total_stored(&ItemKey::any(5), &inventory.window().persistent_slots),
            3
        );
    }
}
