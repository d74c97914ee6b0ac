//! In-memory inventory that follows the server's click rules.
//!
//! Used by the CLI and tests in place of a live connection. Every
//! manipulation is journaled and yields to the runtime before it is
//! acknowledged, so concurrent tasks interleave the way they would against a
//! real server.

use crate::{
    CraftingWindow, CursorState, InventoryError, InventoryFacade, InventoryOp, SlotRef, WindowInfo,
};
use async_trait::async_trait;
use mdminecraft_core::{ItemId, ItemKey, ItemStack, Recipe, DEFAULT_STACK_SIZE};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug)]
struct SimState {
    window: WindowInfo,
    slots: Vec<Option<ItemStack>>,
    cursor: Option<ItemStack>,
    recipes: Vec<Recipe>,
    stack_sizes: HashMap<ItemId, u32>,
    journal: Vec<InventoryOp>,
    dropped: Vec<ItemStack>,
    open: bool,
}

/// Shared handle to a simulated window + cursor.
///
/// Clones share state, so a test can keep one handle for inspection while the
/// crafter drives another.
#[derive(Debug, Clone)]
pub struct SimInventory {
    state: Arc<Mutex<SimState>>,
    ack_delay: Option<Duration>,
}

impl SimInventory {
    /// Create an empty inventory showing `window`.
    pub fn new(window: WindowInfo) -> Self {
        let slots = vec![None; window.slot_count];
        Self {
            state: Arc::new(Mutex::new(SimState {
                window,
                slots,
                cursor: None,
                recipes: Vec::new(),
                stack_sizes: HashMap::new(),
                journal: Vec::new(),
                dropped: Vec::new(),
                open: true,
            })),
            ack_delay: None,
        }
    }

    /// Recipes the simulated server uses to fill the result slot.
    pub fn with_recipes<I>(self, recipes: I) -> Self
    where
        I: IntoIterator<Item = Recipe>,
    {
        self.lock().recipes.extend(recipes);
        self
    }

    /// Override the stack capacity of an item.
    pub fn with_stack_size(self, id: ItemId, max: u32) -> Self {
        self.lock().stack_sizes.insert(id, max.max(1));
        self
    }

    /// Wait this long before acknowledging each manipulation.
    pub fn with_ack_delay(mut self, delay: Duration) -> Self {
        self.ack_delay = Some(delay);
        self
    }

    /// Overwrite a slot's contents.
    pub fn set_slot(&self, slot: SlotRef, stack: Option<ItemStack>) -> Result<(), InventoryError> {
        let mut state = self.lock();
        state.check_slot(slot)?;
        let stack = stack.map(|s| state.normalize(s));
        state.slots[slot.0] = stack;
        Ok(())
    }

    /// Contents of a slot; the result slot shows the pending crafting output.
    pub fn slot(&self, slot: SlotRef) -> Option<ItemStack> {
        let state = self.lock();
        if state.is_result_slot(slot) {
            return state.craft_output().map(|(output, _)| output);
        }
        state.slots.get(slot.0).cloned().flatten()
    }

    /// Add a stack to storage, returning what did not fit.
    pub fn give(&self, stack: ItemStack) -> Option<ItemStack> {
        let mut state = self.lock();
        let stack = state.normalize(stack);
        state.store(stack)
    }

    /// Total matching items across the window's storage slots.
    pub fn stored(&self, item: &ItemKey) -> u32 {
        let state = self.lock();
        let slots = state.window.persistent_slots.clone();
        state.total(item, &slots)
    }

    /// Every manipulation received so far, in order.
    pub fn journal(&self) -> Vec<InventoryOp> {
        self.lock().journal.clone()
    }

    /// Stacks dropped because storage was full.
    pub fn dropped(&self) -> Vec<ItemStack> {
        self.lock().dropped.clone()
    }

    /// Close the window; later manipulations fail.
    pub fn close_window(&self) {
        self.lock().open = false;
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply<F>(&self, op: InventoryOp, f: F) -> Result<(), InventoryError>
    where
        F: FnOnce(&mut SimState) -> Result<(), InventoryError>,
    {
        let mut state = self.lock();
        if !state.open {
            return Err(InventoryError::WindowClosed(op.kind()));
        }
        debug!(op = op.kind(), "applying inventory op");
        state.journal.push(op);
        f(&mut state)
    }

    async fn acknowledge(&self) {
        tokio::task::yield_now().await;
        if let Some(delay) = self.ack_delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl SimState {
    fn stack_size(&self, id: ItemId) -> u32 {
        self.stack_sizes
            .get(&id)
            .copied()
            .unwrap_or(DEFAULT_STACK_SIZE)
    }

    fn normalize(&self, stack: ItemStack) -> ItemStack {
        let max = self.stack_size(stack.id);
        stack.with_max_stack(max)
    }

    fn check_slot(&self, slot: SlotRef) -> Result<(), InventoryError> {
        if slot.0 >= self.slots.len() {
            return Err(InventoryError::InvalidSlot {
                slot,
                kind: self.window.kind.clone(),
            });
        }
        Ok(())
    }

    fn is_result_slot(&self, slot: SlotRef) -> bool {
        self.window
            .as_crafting()
            .is_some_and(|c| c.craft_result_slot() == slot)
    }

    fn total(&self, item: &ItemKey, slots: &[SlotRef]) -> u32 {
        slots
            .iter()
            .filter_map(|slot| self.slots.get(slot.0).and_then(Option::as_ref))
            .filter(|stack| item.matches_stack(stack))
            .map(|stack| stack.count)
            .sum()
    }

    fn click(&mut self, slot: SlotRef, right: bool) -> Result<(), InventoryError> {
        self.check_slot(slot)?;
        if self.is_result_slot(slot) {
            self.take_result();
            return Ok(());
        }

        let target = &mut self.slots[slot.0];
        match (self.cursor.take(), target.take()) {
            (None, None) => {}
            (None, Some(mut stack)) => {
                if right {
                    // Pick up half, rounded up.
                    let half = stack.count.div_ceil(2);
                    self.cursor = stack.split(half);
                    *target = (stack.count > 0).then_some(stack);
                } else {
                    self.cursor = Some(stack);
                }
            }
            (Some(mut held), None) => {
                if right {
                    *target = held.split(1);
                    self.cursor = (held.count > 0).then_some(held);
                } else {
                    *target = Some(held);
                }
            }
            (Some(mut held), Some(mut stack)) => {
                if held.can_merge(&stack) {
                    let moving = if right { 1 } else { held.count };
                    let leftover = stack.add(moving);
                    held.count -= moving - leftover;
                    *target = Some(stack);
                    self.cursor = (held.count > 0).then_some(held);
                } else {
                    *target = Some(held);
                    self.cursor = Some(stack);
                }
            }
        }
        Ok(())
    }

    /// Move one crafting output onto the cursor, consuming the grid.
    fn take_result(&mut self) {
        let Some((output, consumed)) = self.craft_output() else {
            return;
        };
        match self.cursor.as_mut() {
            None => self.cursor = Some(output),
            Some(held) if held.can_merge(&output) && held.remaining_space() >= output.count => {
                held.count += output.count;
            }
            Some(_) => return,
        }
        for (slot, amount) in consumed {
            if let Some(stack) = self.slots[slot.0].as_mut() {
                stack.remove(amount);
                if stack.count == 0 {
                    self.slots[slot.0] = None;
                }
            }
        }
    }

    /// Output of the current grid contents and the items one craft consumes.
    fn craft_output(&self) -> Option<(ItemStack, Vec<(SlotRef, u32)>)> {
        let crafting = self.window.as_crafting()?;
        let grid = GridView::new(crafting, &self.slots);
        self.recipes.iter().find_map(|recipe| {
            let consumed = if recipe.is_shapeless() {
                grid.match_shapeless(recipe)?
            } else {
                grid.match_shaped(recipe)?
            };
            let result = recipe.result();
            let output = self.normalize(ItemStack::new(result.id, result.meta, result.amount));
            Some((output, consumed))
        })
    }

    /// Merge into existing storage stacks, then fill empty slots.
    fn store(&mut self, mut stack: ItemStack) -> Option<ItemStack> {
        let storage = self.window.persistent_slots.clone();

        // First pass: try to merge with existing stacks.
        for slot in &storage {
            if let Some(existing) = self.slots.get_mut(slot.0).and_then(Option::as_mut) {
                if existing.can_merge(&stack) && !existing.is_full() {
                    stack.count = existing.add(stack.count);
                    if stack.count == 0 {
                        return None;
                    }
                }
            }
        }

        // Second pass: find empty slots for the remainder.
        for slot in &storage {
            let Some(entry) = self.slots.get_mut(slot.0) else {
                continue;
            };
            if entry.is_none() {
                let placed = stack.count.min(stack.max_stack);
                *entry = stack.split(placed);
                if stack.count == 0 {
                    return None;
                }
            }
        }

        Some(stack)
    }

    fn drop_stack(&mut self, stack: ItemStack) {
        warn!(item = %stack.key(), count = stack.count, "storage full, dropping stack");
        self.dropped.push(stack);
    }

    fn store_or_drop(&mut self) -> Result<(), InventoryError> {
        if let Some(held) = self.cursor.take() {
            if let Some(leftover) = self.store(held) {
                self.drop_stack(leftover);
            }
        }
        Ok(())
    }

    fn move_to_inventory(&mut self, slots: &[SlotRef]) -> Result<(), InventoryError> {
        for slot in slots {
            self.check_slot(*slot)?;
        }
        for slot in slots {
            if let Some(stack) = self.slots[slot.0].take() {
                if let Some(leftover) = self.store(stack) {
                    self.drop_stack(leftover);
                }
            }
        }
        Ok(())
    }
}

/// Read-only view of a crafting grid as a 2D array.
struct GridView<'a> {
    slots: &'a [SlotRef],
    contents: &'a [Option<ItemStack>],
    width: usize,
}

impl<'a> GridView<'a> {
    fn new(crafting: &'a CraftingWindow, contents: &'a [Option<ItemStack>]) -> Self {
        let slots = crafting.craft_grid_slots();
        let width = match slots.len() {
            4 => 2,
            9 => 3,
            n => n.max(1),
        };
        Self {
            slots,
            contents,
            width,
        }
    }

    fn at(&self, x: usize, y: usize) -> Option<(SlotRef, &'a ItemStack)> {
        if x >= self.width {
            return None;
        }
        let slot = *self.slots.get(x + y * self.width)?;
        let stack = self.contents.get(slot.0)?.as_ref()?;
        Some((slot, stack))
    }

    fn occupied(&self) -> Vec<(usize, usize, SlotRef, &'a ItemStack)> {
        let height = self.slots.len().div_ceil(self.width);
        (0..height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter_map(|(x, y)| self.at(x, y).map(|(slot, stack)| (x, y, slot, stack)))
            .collect()
    }

    fn match_shaped(&self, recipe: &Recipe) -> Option<Vec<(SlotRef, u32)>> {
        let occupied = self.occupied();
        let (gx, gy, gw, gh) = bounds(occupied.iter().map(|(x, y, _, _)| (*x, *y)))?;
        let (rx, ry, rw, rh) = bounds(recipe.cells().map(|(x, y, _)| (x, y)))?;
        if (gw, gh) != (rw, rh) {
            return None;
        }

        let mut consumed = Vec::new();
        for dy in 0..rh {
            for dx in 0..rw {
                let wanted = recipe
                    .in_shape()
                    .get(ry + dy)
                    .and_then(|row| row.get(rx + dx))
                    .and_then(Option::as_ref);
                match (wanted, self.at(gx + dx, gy + dy)) {
                    (None, None) => {}
                    (Some(ingredient), Some((slot, stack)))
                        if ingredient.key().matches_stack(stack) && stack.count >= ingredient.amount =>
                    {
                        consumed.push((slot, ingredient.amount));
                    }
                    _ => return None,
                }
            }
        }
        Some(consumed)
    }

    fn match_shapeless(&self, recipe: &Recipe) -> Option<Vec<(SlotRef, u32)>> {
        let occupied = self.occupied();
        let ingredients: Vec<_> = recipe.cells().map(|(_, _, i)| i).collect();
        if occupied.len() != ingredients.len() {
            return None;
        }

        let mut used = vec![false; occupied.len()];
        let mut consumed = Vec::new();
        for ingredient in ingredients {
            let index = occupied.iter().enumerate().position(|(i, (_, _, _, stack))| {
                !used[i] && ingredient.key().matches_stack(stack) && stack.count >= ingredient.amount
            })?;
            used[index] = true;
            consumed.push((occupied[index].2, ingredient.amount));
        }
        Some(consumed)
    }
}

/// Bounding box `(min_x, min_y, width, height)` of a set of cells.
fn bounds<I>(cells: I) -> Option<(usize, usize, usize, usize)>
where
    I: Iterator<Item = (usize, usize)>,
{
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for (x, y) in cells {
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

#[async_trait]
impl InventoryFacade for SimInventory {
    fn window(&self) -> WindowInfo {
        self.lock().window.clone()
    }

    fn cursor(&self) -> CursorState {
        CursorState {
            stack: self.lock().cursor.clone(),
        }
    }

    fn find_slot(&self, item: &ItemKey, slots: &[SlotRef]) -> Option<SlotRef> {
        let state = self.lock();
        slots.iter().copied().find(|slot| {
            state
                .slots
                .get(slot.0)
                .and_then(Option::as_ref)
                .is_some_and(|stack| item.matches_stack(stack))
        })
    }

    fn total_stored(&self, item: &ItemKey, slots: &[SlotRef]) -> u32 {
        self.lock().total(item, slots)
    }

    async fn click_slot(&self, slot: SlotRef, right: bool) -> Result<(), InventoryError> {
        self.apply(InventoryOp::Click { slot, right }, |state| {
            state.click(slot, right)
        })?;
        self.acknowledge().await;
        Ok(())
    }

    async fn store_or_drop(&self) -> Result<(), InventoryError> {
        self.apply(InventoryOp::StoreOrDrop, SimState::store_or_drop)?;
        self.acknowledge().await;
        Ok(())
    }

    async fn move_to_inventory(&self, slots: &[SlotRef]) -> Result<(), InventoryError> {
        let op = InventoryOp::MoveToInventory {
            slots: slots.to_vec(),
        };
        self.apply(op, |state| state.move_to_inventory(slots))?;
        self.acknowledge().await;
        Ok(())
    }
}
