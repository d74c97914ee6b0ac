//! Window layouts and the crafting capability.
//!
//! Slot numbering follows the 1.8 window protocol: the player window puts the
//! crafting result at slot 0, its 2x2 grid at 1-4 and the main inventory at
//! 9-44; a crafting table uses 0, 1-9 and 10-45.

use crate::SlotRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of the currently open window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowKind {
    /// The player's own inventory (always open when nothing else is).
    Player,
    /// A crafting table.
    CraftingTable,
    /// A single or double chest.
    Chest,
    /// Anything else, named by the server-side window type.
    Other(String),
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKind::Player => write!(f, "PlayerWindow"),
            WindowKind::CraftingTable => write!(f, "CraftingTableWindow"),
            WindowKind::Chest => write!(f, "ChestWindow"),
            WindowKind::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Crafting capability of a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingWindow {
    grid_slots: Vec<SlotRef>,
    result_slot: SlotRef,
    persistent_slots: Vec<SlotRef>,
}

impl CraftingWindow {
    /// Describe a crafting grid. Grid slots are row-major.
    pub fn new(grid_slots: Vec<SlotRef>, result_slot: SlotRef, persistent_slots: Vec<SlotRef>) -> Self {
        Self {
            grid_slots,
            result_slot,
            persistent_slots,
        }
    }

    /// Grid slots, row-major.
    pub fn craft_grid_slots(&self) -> &[SlotRef] {
        &self.grid_slots
    }

    /// Slot holding the crafting output.
    pub fn craft_result_slot(&self) -> SlotRef {
        self.result_slot
    }

    /// Storage slots that survive closing the window.
    pub fn persistent_slots(&self) -> &[SlotRef] {
        &self.persistent_slots
    }
}

/// Snapshot of the open window's layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Window type.
    pub kind: WindowKind,
    /// Total number of slots in the window.
    pub slot_count: usize,
    /// Storage slots that survive closing the window.
    pub persistent_slots: Vec<SlotRef>,
    /// Present only for windows with a crafting grid.
    pub crafting: Option<CraftingWindow>,
}

fn slot_range(start: usize, end: usize) -> Vec<SlotRef> {
    (start..end).map(SlotRef).collect()
}

impl WindowInfo {
    /// The player window: 2x2 grid, 36 storage slots.
    pub fn player() -> Self {
        let persistent = slot_range(9, 45);
        Self {
            kind: WindowKind::Player,
            slot_count: 45,
            crafting: Some(CraftingWindow::new(
                slot_range(1, 5),
                SlotRef(0),
                persistent.clone(),
            )),
            persistent_slots: persistent,
        }
    }

    /// A crafting table window: 3x3 grid, 36 storage slots.
    pub fn crafting_table() -> Self {
        let persistent = slot_range(10, 46);
        Self {
            kind: WindowKind::CraftingTable,
            slot_count: 46,
            crafting: Some(CraftingWindow::new(
                slot_range(1, 10),
                SlotRef(0),
                persistent.clone(),
            )),
            persistent_slots: persistent,
        }
    }

    /// A single chest: 27 container slots followed by 36 storage slots.
    pub fn chest() -> Self {
        Self {
            kind: WindowKind::Chest,
            slot_count: 63,
            persistent_slots: slot_range(27, 63),
            crafting: None,
        }
    }

    /// A window with an arbitrary crafting grid; used for unusual server layouts.
    pub fn with_crafting(kind: WindowKind, slot_count: usize, crafting: CraftingWindow) -> Self {
        Self {
            kind,
            slot_count,
            persistent_slots: crafting.persistent_slots().to_vec(),
            crafting: Some(crafting),
        }
    }

    /// Typed capability check.
    pub fn as_crafting(&self) -> Option<&CraftingWindow> {
        self.crafting.as_ref()
    }
}
