//! Item system - Item identifiers, variant keys, and inventory stacks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric item identifier as used on the wire (`id` in `id:meta`).
pub type ItemId = u16;

/// Item variant (damage/metadata value).
pub type ItemMeta = u16;

/// Maximum stack size for most items.
pub const DEFAULT_STACK_SIZE: u32 = 64;

fn default_stack_size() -> u32 {
    DEFAULT_STACK_SIZE
}

/// Identifies an item kind, optionally pinned to one variant.
///
/// A key without `meta` matches every variant of `id`. Ingredients use this
/// for recipes that accept e.g. any kind of plank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    /// Item identifier.
    pub id: ItemId,
    /// Variant, `None` for "any variant".
    #[serde(default)]
    pub meta: Option<ItemMeta>,
}

impl ItemKey {
    /// Key for one concrete variant.
    pub const fn new(id: ItemId, meta: ItemMeta) -> Self {
        Self {
            id,
            meta: Some(meta),
        }
    }

    /// Key matching every variant of `id`.
    pub const fn any(id: ItemId) -> Self {
        Self { id, meta: None }
    }

    /// Check whether an item with the given id/variant satisfies this key.
    pub fn matches(&self, id: ItemId, meta: ItemMeta) -> bool {
        self.id == id && self.meta.map_or(true, |m| m == meta)
    }

    /// Check whether a stack satisfies this key.
    pub fn matches_stack(&self, stack: &ItemStack) -> bool {
        self.matches(stack.id, stack.meta)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.meta {
            Some(meta) => write!(f, "{}:{}", self.id, meta),
            None => write!(f, "{}:*", self.id),
        }
    }
}

/// Represents a stack of items in an inventory slot or on the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier.
    pub id: ItemId,
    /// Item variant.
    #[serde(default)]
    pub meta: ItemMeta,
    /// Number of items in this stack.
    pub count: u32,
    /// Stack capacity for this item.
    #[serde(default = "default_stack_size")]
    pub max_stack: u32,
}

impl ItemStack {
    /// Create a new item stack with the default stack size.
    pub fn new(id: ItemId, meta: ItemMeta, count: u32) -> Self {
        Self {
            id,
            meta,
            count,
            max_stack: DEFAULT_STACK_SIZE,
        }
    }

    /// Override the stack capacity.
    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = max_stack.max(1);
        self
    }

    /// Concrete key of this stack.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.id, self.meta)
    }

    /// Check if this stack can merge with another stack.
    pub fn can_merge(&self, other: &ItemStack) -> bool {
        self.id == other.id && self.meta == other.meta
    }

    /// Check if this stack is at max capacity.
    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack
    }

    /// Get remaining space in this stack.
    pub fn remaining_space(&self) -> u32 {
        self.max_stack.saturating_sub(self.count)
    }

    /// Try to add items to this stack, returning the amount that didn't fit.
    pub fn add(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.remaining_space());
        self.count += added;
        amount - added
    }

    /// Try to remove items from this stack, returning the amount actually removed.
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.count);
        self.count -= removed;
        removed
    }

    /// Split this stack, taking the specified amount into a new stack.
    pub fn split(&mut self, amount: u32) -> Option<ItemStack> {
        if amount == 0 || amount > self.count {
            return None;
        }

        self.count -= amount;
        Some(ItemStack {
            id: self.id,
            meta: self.meta,
            count: amount,
            max_stack: self.max_stack,
        })
    }
}
