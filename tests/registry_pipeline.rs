use mdminecraft_assets::recipes_from_str;
use mdminecraft_core::ItemStack;
use mdminecraft_craft::{CraftOutcome, CraftRequest, Crafter, TaskScheduler};
use mdminecraft_inventory::{SimInventory, WindowInfo};
use std::sync::Arc;

const PACK: &str = r#"
[
  { "result": { "id": 50, "count": 4 }, "inShape": [[{ "id": 263 }], [{ "id": 280 }]] },
  { "result": { "id": 280, "count": 4 }, "inShape": [[{ "id": 5 }], [{ "id": 5 }]] }
]
"#;

#[tokio::test]
async fn recipe_pack_to_crafted_items() {
    let registry = Arc::new(recipes_from_str(PACK).expect("valid pack"));
    let inventory = SimInventory::new(WindowInfo::player()).with_recipes(registry.iter().cloned());
    inventory.give(ItemStack::new(5, 0, 2));

    let crafter = Crafter::new(
        registry,
        Arc::new(inventory.clone()),
        TaskScheduler::try_current().unwrap(),
    );
    let handle = crafter
        .craft(CraftRequest::item(280).amount(4))
        .expect("stick recipe");
    assert_eq!(
        handle.wait().await,
        CraftOutcome::Completed {
            crafted: 4,
            requested: 4
        }
    );
    assert_eq!(inventory.stored(&mdminecraft_core::ItemKey::any(280)), 4);
}
