//! Executes a [`Plan`] against the inventory.
//!
//! The executor is a small state machine: fill the grid, collect the output,
//! return leftovers. Each manipulation is awaited before the next one is
//! issued, so at most one operation is in flight per executor.

use crate::error::CraftError;
use crate::planner::Plan;
use mdminecraft_inventory::InventoryFacade;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Phase of a running craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    /// Placing ingredients into the grid.
    Filling,
    /// Taking result items out of the result slot.
    Collecting,
    /// Moving grid leftovers back into storage.
    Returning,
    /// Finished.
    Done,
}

/// How a craft task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CraftOutcome {
    /// Every phase ran. `crafted` may fall short of `requested` if the result
    /// slot ran dry early.
    Completed {
        /// Result items moved into storage.
        crafted: u32,
        /// Result items asked for.
        requested: u32,
    },
    /// The task stopped with an error.
    Aborted(CraftError),
}

impl CraftOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CraftOutcome::Completed { .. })
    }

    /// Completed, but with fewer items than requested.
    pub fn is_shortfall(&self) -> bool {
        matches!(self, CraftOutcome::Completed { crafted, requested } if crafted < requested)
    }

    pub fn crafted(&self) -> u32 {
        match self {
            CraftOutcome::Completed { crafted, .. } => *crafted,
            CraftOutcome::Aborted(_) => 0,
        }
    }

    pub fn error(&self) -> Option<&CraftError> {
        match self {
            CraftOutcome::Aborted(err) => Some(err),
            CraftOutcome::Completed { .. } => None,
        }
    }
}

pub struct Executor {
    plan: Plan,
    inventory: Arc<dyn InventoryFacade>,
    state: ExecutorState,
    crafted: u32,
}

impl Executor {
    pub fn new(plan: Plan, inventory: Arc<dyn InventoryFacade>) -> Self {
        Self {
            plan,
            inventory,
            state: ExecutorState::Filling,
            crafted: 0,
        }
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    /// Result items collected so far.
    pub fn crafted(&self) -> u32 {
        self.crafted
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Run the current phase and advance to the next.
    pub async fn step(&mut self) -> Result<ExecutorState, CraftError> {
        self.state = match self.state {
            ExecutorState::Filling => {
                self.fill().await?;
                ExecutorState::Collecting
            }
            ExecutorState::Collecting => {
                self.collect().await?;
                ExecutorState::Returning
            }
            ExecutorState::Returning => {
                self.return_leftovers().await?;
                ExecutorState::Done
            }
            ExecutorState::Done => ExecutorState::Done,
        };
        Ok(self.state)
    }

    /// Drive the craft to completion or the first error.
    #[instrument(skip_all, fields(result = %self.plan.recipe().result(), amount = self.plan.amount()))]
    pub async fn run(mut self) -> CraftOutcome {
        loop {
            match self.step().await {
                Ok(ExecutorState::Done) => {
                    let requested = self.plan.amount();
                    if self.crafted < requested {
                        warn!(crafted = self.crafted, requested, "craft finished short");
                    } else {
                        info!(crafted = self.crafted, "craft finished");
                    }
                    return CraftOutcome::Completed {
                        crafted: self.crafted,
                        requested,
                    };
                }
                Ok(state) => debug!(?state, "craft advanced"),
                Err(err) => {
                    warn!(%err, state = ?self.state, crafted = self.crafted, "craft aborted");
                    return CraftOutcome::Aborted(err);
                }
            }
        }
    }

    /// Place every ingredient `craft_times` times into its cells with single
    /// right clicks, refilling the cursor from storage when it runs empty.
    async fn fill(&self) -> Result<(), CraftError> {
        let grid = self.plan.grid();
        let storage = self.plan.storage();
        let craft_times = self.plan.craft_times();

        for (ingredient, cells) in self.plan.placements().iter() {
            for cell in cells {
                let Some(target) = grid.slot_at(cell.x, cell.y) else {
                    return Err(CraftError::RecipeTooLarge {
                        result: *self.plan.recipe().result(),
                        width: grid.width(),
                        height: grid.height(),
                    });
                };
                for _ in 0..cell.amount.saturating_mul(craft_times) {
                    if self.inventory.cursor().is_empty() {
                        let Some(source) = self.inventory.find_slot(ingredient, storage) else {
                            return Err(CraftError::MissingIngredientRace(*ingredient));
                        };
                        self.inventory.click_slot(source, false).await?;
                    }
                    self.inventory.click_slot(target, true).await?;
                }
            }
            // Leftovers of this ingredient go back before the next one is picked.
            if !self.inventory.cursor().is_empty() {
                self.inventory.store_or_drop().await?;
            }
        }
        Ok(())
    }

    /// Click the result slot until enough output has been taken.
    ///
    /// The cursor stack is committed to storage once a click stops growing it
    /// (the grid ran dry or the items cannot merge) or it reaches capacity.
    async fn collect(&mut self) -> Result<(), CraftError> {
        let requested = self.plan.amount();
        let result_slot = self.plan.result_slot();
        let mut previous = self.inventory.cursor().amount();

        while requested > self.crafted.saturating_add(self.inventory.cursor().amount()) {
            self.inventory.click_slot(result_slot, false).await?;
            let cursor = self.inventory.cursor();
            if cursor.is_empty() {
                debug!(crafted = self.crafted, "result slot produced nothing");
                break;
            }
            if cursor.amount() == previous || cursor.amount() == cursor.max_amount() {
                self.crafted += cursor.amount();
                self.inventory.store_or_drop().await?;
            }
            previous = self.inventory.cursor().amount();
        }

        let remaining = self.inventory.cursor().amount();
        if remaining > 0 {
            self.crafted += remaining;
            self.inventory.store_or_drop().await?;
        }
        Ok(())
    }

    async fn return_leftovers(&self) -> Result<(), CraftError> {
        self.inventory
            .move_to_inventory(self.plan.grid().slots())
            .await?;
        Ok(())
    }
}
