//! Pure conversions from store internals to reader-facing views.
//!
//! Nothing here locks or mutates: callers pass in borrowed state (already
//! under the store's lock) and get owned values back.

use std::collections::VecDeque;

use vantage_types::{GameEvent, InventoryView, Snapshot};

use crate::store::StateFields;

/// Translate a signed request count into a buffer limit (`n <= 0` is zero).
pub fn event_limit(n: i64) -> usize {
    if n <= 0 {
        0
    } else {
        usize::try_from(n).unwrap_or(usize::MAX)
    }
}

/// Clone the `limit` newest events, newest first.
pub(crate) fn newest(events: &VecDeque<GameEvent>, limit: usize) -> Vec<GameEvent> {
    events.iter().take(limit).cloned().collect()
}

/// Build an owned snapshot of `fields` with at most `limit` newest events.
pub(crate) fn encode(fields: &StateFields, events: &VecDeque<GameEvent>, limit: usize) -> Snapshot {
    Snapshot {
        x: fields.x,
        y: fields.y,
        z: fields.z,
        health: fields.health,
        hunger: fields.hunger,
        dimension: fields.dimension.clone(),
        biome: fields.biome.clone(),
        time_of_day: fields.time_of_day,
        is_night: fields.is_night,
        block_under_crosshair: fields.block_under_crosshair.clone(),
        movement_vector: fields.movement_vector,
        selected_item: fields.selected_item.clone(),
        inventory: fields.inventory,
        inventory_full: fields.inventory_full.clone(),
        recent_events: newest(events, limit),
    }
}

/// Project a snapshot onto the inventory-only view.
pub fn inventory_view(snapshot: Snapshot) -> InventoryView {
    InventoryView {
        summary: snapshot.inventory,
        counts: snapshot.inventory_full.counts,
        slots: snapshot.inventory_full.slots,
    }
}
