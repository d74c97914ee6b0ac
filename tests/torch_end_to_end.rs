//! The craft protocol observed through the simulated window.

use mdminecraft_core::{ItemKey, ItemStack};
use mdminecraft_craft::{
    plan_recipe, CraftError, CraftOutcome, CraftRequest, Crafter, Executor, ParentTask,
    TaskScheduler,
};
use mdminecraft_inventory::{InventoryFacade, InventoryOp, SimInventory, SlotRef, WindowInfo};
use mdminecraft_testkit::{
    default_registry, full_snapshot, plank_torch_recipe, stored_any, torch_table, PLANKS, STICK,
    TORCH,
};
use proptest::prelude::*;
use std::sync::Arc;

fn click(slot: usize, right: bool) -> InventoryOp {
    InventoryOp::Click {
        slot: SlotRef(slot),
        right,
    }
}

fn crafter(inv: &SimInventory) -> Crafter {
    Crafter::new(
        Arc::new(default_registry()),
        Arc::new(inv.clone()),
        TaskScheduler::try_current().unwrap(),
    )
}

#[tokio::test]
async fn four_torches_from_one_plank_and_stick() {
    let inv = torch_table(1, 1);
    let handle = crafter(&inv)
        .craft(CraftRequest::recipe(plank_torch_recipe()).amount(4))
        .unwrap();
    assert_eq!(handle.recipe(), &plank_torch_recipe());

    let outcome = handle.wait().await;
    assert_eq!(
        outcome,
        CraftOutcome::Completed {
            crafted: 4,
            requested: 4
        }
    );
    assert_eq!(
        inv.journal(),
        vec![
            click(10, false),
            click(1, true),
            click(11, false),
            click(4, true),
            click(0, false),
            InventoryOp::StoreOrDrop,
            InventoryOp::MoveToInventory {
                slots: (1..=9).map(SlotRef).collect(),
            },
        ]
    );
    assert_eq!(stored_any(&inv, TORCH), 4);
    assert_eq!(stored_any(&inv, PLANKS), 0);
    assert_eq!(stored_any(&inv, STICK), 0);
}

#[tokio::test]
async fn leftover_ingredients_are_stored_between_kinds() {
    let inv = torch_table(3, 3);
    let outcome = crafter(&inv)
        .craft(CraftRequest::recipe(plank_torch_recipe()).amount(4))
        .unwrap()
        .wait()
        .await;
    assert!(outcome.is_completed());
    assert_eq!(
        &inv.journal()[..6],
        &[
            click(10, false),
            click(1, true),
            InventoryOp::StoreOrDrop,
            click(11, false),
            click(4, true),
            InventoryOp::StoreOrDrop,
        ]
    );
    assert_eq!(stored_any(&inv, PLANKS), 2);
    assert_eq!(stored_any(&inv, STICK), 2);
}

#[tokio::test]
async fn full_result_stacks_are_committed() {
    // Torches stack to 16 here: 24 torches need a commit at the cap.
    let inv = SimInventory::new(WindowInfo::crafting_table())
        .with_recipes([plank_torch_recipe()])
        .with_stack_size(TORCH, 16);
    inv.give(ItemStack::new(PLANKS, 0, 6));
    inv.give(ItemStack::new(STICK, 0, 6));

    let outcome = crafter(&inv)
        .craft(CraftRequest::recipe(plank_torch_recipe()).amount(24))
        .unwrap()
        .wait()
        .await;
    assert_eq!(outcome.crafted(), 24);
    assert_eq!(stored_any(&inv, TORCH), 24);
    assert!(inv.cursor().is_empty());
    let result_clicks = inv
        .journal()
        .iter()
        .filter(|op| **op == click(0, false))
        .count();
    assert_eq!(result_clicks, 6);
}

#[tokio::test]
async fn race_leaves_placed_items_in_grid() {
    let inv = torch_table(1, 1);
    let plan = plan_recipe(&plank_torch_recipe(), 4, &inv.window(), &inv).unwrap();
    inv.set_slot(SlotRef(11), None).unwrap();

    let outcome = Executor::new(plan, Arc::new(inv.clone())).run().await;
    assert_eq!(
        outcome,
        CraftOutcome::Aborted(CraftError::MissingIngredientRace(ItemKey::any(STICK)))
    );
    assert_eq!(inv.journal(), vec![click(10, false), click(1, true)]);
    assert_eq!(inv.slot(SlotRef(1)), Some(ItemStack::new(PLANKS, 0, 1)));
}

#[tokio::test]
async fn planning_failures_issue_no_ops() {
    let requests = [
        (WindowInfo::crafting_table(), 0, "InvalidAmount"),
        (WindowInfo::chest(), 4, "UnsupportedWindow"),
        (WindowInfo::crafting_table(), 8, "InsufficientIngredients"),
    ];
    for (window, amount, expected) in requests {
        let inv = SimInventory::new(window).with_recipes([plank_torch_recipe()]);
        inv.give(ItemStack::new(PLANKS, 0, 1));
        inv.give(ItemStack::new(STICK, 0, 1));
        let before = full_snapshot(&inv);

        let (parent, mut failures) = ParentTask::channel();
        let outcome = crafter(&inv)
            .craft(
                CraftRequest::recipe(plank_torch_recipe())
                    .amount(amount)
                    .parent(parent),
            )
            .unwrap()
            .wait()
            .await;

        let err = outcome.error().cloned().unwrap();
        assert!(format!("{err:?}").starts_with(expected), "{err:?}");
        assert!(err.is_planning());
        assert_eq!(failures.recv().await.unwrap().error, err);
        assert_eq!(full_snapshot(&inv), before);
        assert!(inv.journal().is_empty());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: a feasible craft yields at least the requested amount and
    /// consumes exactly craft_times of each ingredient
    #[test]
    fn feasible_craft_accounts_for_every_item(
        planks in 1u32..40,
        sticks in 1u32..40,
        amount in 1i64..200,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let inv = torch_table(planks, sticks);
        let times = (amount as u32).div_ceil(4);
        prop_assume!(times <= planks && times <= sticks);

        let outcome = runtime.block_on(async {
            crafter(&inv)
                .craft(CraftRequest::recipe(plank_torch_recipe()).amount(amount))
                .unwrap()
                .wait()
                .await
        });

        prop_assert_eq!(
            outcome,
            CraftOutcome::Completed { crafted: times * 4, requested: amount as u32 }
        );
        prop_assert_eq!(stored_any(&inv, TORCH), times * 4);
        prop_assert_eq!(stored_any(&inv, PLANKS), planks - times);
        prop_assert_eq!(stored_any(&inv, STICK), sticks - times);
        prop_assert!(inv.cursor().is_empty());
    }
}
