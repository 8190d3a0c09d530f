//! The state store: current host state plus a bounded recent-event buffer.
//!
//! [`StateStore`] is the single synchronization point of the service. The
//! producer is its only writer; the HTTP handlers and the persister read
//! from it concurrently. Every public operation takes the same mutex for
//! the duration of that one operation only, and reads copy out before the
//! lock is released, so a reader never observes a half-applied update.
//!
//! Field updates replace a value wholesale. Grouped values (position, time
//! plus night flag, movement vector, inventories) are replaced together.
//!
//! Events are kept newest-first. Inserting beyond capacity evicts from the
//! oldest end, and an evicted event is never returned again.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use vantage_types::{
    EventDraft, GameEvent, InventoryFull, InventorySummary, MovementVector, SlotItem, Snapshot,
};

use crate::codec;

/// Default recent-event buffer capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Smallest capacity the store accepts; lower requests are raised to this.
pub const MIN_EVENT_CAPACITY: usize = 32;

/// Source of wall-clock milliseconds used to stamp inserted events.
pub type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Current scalar, vector, and inventory state.
#[derive(Debug, Clone, Default)]
pub(crate) struct StateFields {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
    pub(crate) health: f32,
    pub(crate) hunger: i32,
    pub(crate) dimension: String,
    pub(crate) biome: String,
    pub(crate) time_of_day: u32,
    pub(crate) is_night: bool,
    pub(crate) block_under_crosshair: Option<String>,
    pub(crate) movement_vector: MovementVector,
    pub(crate) selected_item: Option<String>,
    pub(crate) inventory: InventorySummary,
    pub(crate) inventory_full: InventoryFull,
}

/// Everything guarded by the store's mutex.
#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    pub(crate) fields: StateFields,
    /// Newest event at the front.
    pub(crate) events: VecDeque<GameEvent>,
    last_timestamp: i64,
}

/// Thread-safe store of the latest host state and recent events.
///
/// Shared between roles via `Arc<StateStore>`; all methods take `&self`.
pub struct StateStore {
    capacity: usize,
    clock: Clock,
    inner: Mutex<StoreInner>,
}

impl core::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateStore")
            .field("capacity", &self.capacity)
            .field("events", &self.event_count())
            .finish_non_exhaustive()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl StateStore {
    /// Create a store holding at most `capacity` events.
    ///
    /// Capacities below [`MIN_EVENT_CAPACITY`] are raised to it.
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Box::new(|| chrono::Utc::now().timestamp_millis()))
    }

    /// Create a store that stamps events with `clock` instead of the system time.
    pub fn with_clock(capacity: usize, clock: Clock) -> Self {
        let capacity = capacity.max(MIN_EVENT_CAPACITY);
        Self {
            capacity,
            clock,
            inner: Mutex::new(StoreInner {
                events: VecDeque::with_capacity(capacity),
                ..StoreInner::default()
            }),
        }
    }

    /// The effective event capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events currently buffered.
    pub fn event_count(&self) -> usize {
        self.lock().events.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A panicking writer can only have replaced whole values, so the
        // guarded state is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Deep copy of all current fields and the full event history.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        codec::encode(&inner.fields, &inner.events, inner.events.len())
    }

    /// Like [`snapshot`](Self::snapshot), keeping at most `n` newest events.
    ///
    /// `n <= 0` yields an empty event list. The buffer itself is untouched.
    pub fn snapshot_limited(&self, n: i64) -> Snapshot {
        let limit = codec::event_limit(n);
        let inner = self.lock();
        codec::encode(&inner.fields, &inner.events, limit)
    }

    /// Up to `n` newest events, newest first. `n <= 0` yields nothing.
    pub fn recent_events(&self, n: i64) -> Vec<GameEvent> {
        let limit = codec::event_limit(n);
        let inner = self.lock();
        codec::newest(&inner.events, limit)
    }

    /// The newest event, if any.
    pub fn last_event(&self) -> Option<GameEvent> {
        self.lock().events.front().cloned()
    }

    /// Copy of the category summary.
    pub fn inventory_summary(&self) -> InventorySummary {
        self.lock().fields.inventory
    }

    /// Copy of the full inventory.
    pub fn inventory_full(&self) -> InventoryFull {
        self.lock().fields.inventory_full.clone()
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Replace the position.
    pub fn update_position(&self, x: f64, y: f64, z: f64) {
        let mut inner = self.lock();
        inner.fields.x = x;
        inner.fields.y = y;
        inner.fields.z = z;
    }

    /// Replace the health value.
    pub fn update_health(&self, health: f32) {
        self.lock().fields.health = health;
    }

    /// Replace the hunger value.
    pub fn update_hunger(&self, hunger: i32) {
        self.lock().fields.hunger = hunger;
    }

    /// Replace the dimension identifier.
    pub fn update_dimension(&self, dimension: impl Into<String>) {
        let dimension = dimension.into();
        self.lock().fields.dimension = dimension;
    }

    /// Replace the biome identifier.
    pub fn update_biome(&self, biome: impl Into<String>) {
        let biome = biome.into();
        self.lock().fields.biome = biome;
    }

    /// Replace the time of day and night flag together.
    pub fn update_time(&self, time_of_day: u32, is_night: bool) {
        let mut inner = self.lock();
        inner.fields.time_of_day = time_of_day;
        inner.fields.is_night = is_night;
    }

    /// Replace the block under the crosshair (`None` when nothing is targeted).
    pub fn update_block_under_crosshair(&self, block: Option<String>) {
        self.lock().fields.block_under_crosshair = block;
    }

    /// Replace the movement vector.
    pub fn update_movement_vector(&self, movement: MovementVector) {
        self.lock().fields.movement_vector = movement;
    }

    /// Replace the selected item (`None` for an empty hand).
    pub fn update_selected_item(&self, item: Option<String>) {
        self.lock().fields.selected_item = item;
    }

    /// Replace the category summary.
    pub fn update_inventory_summary(&self, summary: InventorySummary) {
        self.lock().fields.inventory = summary;
    }

    /// Replace the full inventory with the given counts and slots.
    pub fn update_inventory_full(&self, counts: BTreeMap<String, u32>, slots: Vec<SlotItem>) {
        let full = InventoryFull::new(counts, slots);
        self.lock().fields.inventory_full = full;
    }

    /// Stamp and insert an event at the newest end.
    ///
    /// Evicts from the oldest end until the buffer is back at capacity.
    /// `None` is a no-op. Timestamps never decrease in insertion order.
    pub fn push_event(&self, draft: impl Into<Option<EventDraft>>) {
        let Some(draft) = draft.into() else {
            return;
        };
        let now = (self.clock)();

        let mut inner = self.lock();
        let timestamp = now.max(inner.last_timestamp);
        inner.last_timestamp = timestamp;
        inner.events.push_front(GameEvent::from_draft(draft, timestamp));
        while inner.events.len() > self.capacity {
            inner.events.pop_back();
        }
    }
}
