#![warn(missing_docs)]
//! Inventory facade consumed by the crafter.
//!
//! The facade exposes read access to the open window, the cursor and storage
//! lookups, plus three asynchronous manipulations that each resolve once the
//! server has confirmed the resulting inventory state.

mod sim;
mod window;

pub use sim::SimInventory;
pub use window::{CraftingWindow, WindowInfo, WindowKind};

use async_trait::async_trait;
use mdminecraft_core::{ItemKey, ItemStack};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Index of a slot inside the open window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotRef(pub usize);

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Items held by the cursor between clicks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorState {
    /// Held stack, if any.
    pub stack: Option<ItemStack>,
}

impl CursorState {
    /// Number of held items.
    pub fn amount(&self) -> u32 {
        self.stack.as_ref().map_or(0, |s| s.count)
    }

    /// Stack capacity of the held item (0 when empty).
    pub fn max_amount(&self) -> u32 {
        self.stack.as_ref().map_or(0, |s| s.max_stack)
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.amount() == 0
    }
}

/// A single manipulation sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InventoryOp {
    /// Click on a slot; right clicks move single items.
    Click {
        /// Target slot.
        slot: SlotRef,
        /// Right mouse button.
        right: bool,
    },
    /// Put the cursor stack back into storage, dropping what does not fit.
    StoreOrDrop,
    /// Move the listed slots' contents into storage.
    MoveToInventory {
        /// Source slots.
        slots: Vec<SlotRef>,
    },
}

impl InventoryOp {
    /// Short label for logs and journals.
    pub fn kind(&self) -> &'static str {
        match self {
            InventoryOp::Click { right: false, .. } => "click",
            InventoryOp::Click { right: true, .. } => "right_click",
            InventoryOp::StoreOrDrop => "store_or_drop",
            InventoryOp::MoveToInventory { .. } => "move_to_inventory",
        }
    }
}

/// Failures reported by the inventory facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The slot does not exist in the open window.
    #[error("slot {slot} is outside the {kind} window")]
    InvalidSlot {
        /// Offending slot.
        slot: SlotRef,
        /// Window kind that was open.
        kind: WindowKind,
    },
    /// The window was closed before the operation was confirmed.
    #[error("window closed before {0} was confirmed")]
    WindowClosed(&'static str),
}

/// Operations the crafter requires from the inventory.
///
/// Reads are synchronous snapshots. Mutations suspend the caller until the
/// change is confirmed; only one should be in flight per task.
#[async_trait]
pub trait InventoryFacade: Send + Sync {
    /// Layout of the open window.
    fn window(&self) -> WindowInfo;

    /// Items currently held by the cursor.
    fn cursor(&self) -> CursorState;

    /// First slot among `slots` holding an item matching `item`.
    fn find_slot(&self, item: &ItemKey, slots: &[SlotRef]) -> Option<SlotRef>;

    /// Total number of items matching `item` across `slots`.
    fn total_stored(&self, item: &ItemKey, slots: &[SlotRef]) -> u32;

    /// Click a slot.
    async fn click_slot(&self, slot: SlotRef, right: bool) -> Result<(), InventoryError>;

    /// Return the cursor stack to storage, dropping the rest.
    async fn store_or_drop(&self) -> Result<(), InventoryError>;

    /// Move the contents of `slots` into storage.
    async fn move_to_inventory(&self, slots: &[SlotRef]) -> Result<(), InventoryError>;
}
