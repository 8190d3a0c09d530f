//! Point-in-time state views handed to readers.
//!
//! A [`Snapshot`] is always an owned copy: once returned from the store it
//! shares nothing with the store's internals, so neither side can observe
//! the other's later mutations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::events::GameEvent;

/// Position delta between the previous sample and the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MovementVector {
    /// Delta along the x axis.
    pub dx: f64,
    /// Delta along the y axis.
    pub dy: f64,
    /// Delta along the z axis.
    pub dz: f64,
}

impl MovementVector {
    /// Create a movement vector from its three deltas.
    pub const fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }
}

/// Pre-aggregated counts for the three tracked item categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventorySummary {
    /// Logs and stems.
    pub logs: u32,
    /// Planks.
    pub planks: u32,
    /// Edible items.
    pub foods: u32,
}

impl InventorySummary {
    /// Create a summary from the three category counts.
    pub const fn new(logs: u32, planks: u32, foods: u32) -> Self {
        Self {
            logs,
            planks,
            foods,
        }
    }
}

/// One occupied inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SlotItem {
    /// Slot index in the host inventory.
    pub index: u32,
    /// Namespaced item identifier.
    pub item: String,
    /// Stack size.
    pub count: u32,
}

impl SlotItem {
    /// Create a slot record.
    pub fn new(index: u32, item: impl Into<String>, count: u32) -> Self {
        Self {
            index,
            item: item.into(),
            count,
        }
    }
}

/// The full inventory: aggregate per-item counts plus per-slot records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryFull {
    /// Aggregate count per item identifier.
    pub counts: BTreeMap<String, u32>,
    /// Occupied slots in host order.
    pub slots: Vec<SlotItem>,
}

impl InventoryFull {
    /// Build a full inventory from counts and slots.
    pub const fn new(counts: BTreeMap<String, u32>, slots: Vec<SlotItem>) -> Self {
        Self { counts, slots }
    }

    /// Total number of items across all slots.
    pub fn total_items(&self) -> u64 {
        self.slots.iter().map(|s| u64::from(s.count)).sum()
    }
}

/// Immutable point-in-time copy of all current state and recent events.
///
/// Position is serialized as top-level `x`, `y`, `z`; every other field
/// uses the camel-cased wire name (`timeOfDay`, `blockUnderCrosshair`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// Position, x coordinate.
    pub x: f64,
    /// Position, y coordinate.
    pub y: f64,
    /// Position, z coordinate.
    pub z: f64,
    /// Current health.
    pub health: f32,
    /// Current hunger (food level).
    pub hunger: i32,
    /// Namespaced dimension identifier.
    pub dimension: String,
    /// Namespaced biome identifier.
    pub biome: String,
    /// Time of day in ticks, `0..24000`.
    pub time_of_day: u32,
    /// Whether the time of day falls in the night window.
    pub is_night: bool,
    /// Block under the crosshair, if any.
    pub block_under_crosshair: Option<String>,
    /// Movement since the previous sample.
    pub movement_vector: MovementVector,
    /// Item held in the main hand, if any.
    pub selected_item: Option<String>,
    /// Category counts.
    pub inventory: InventorySummary,
    /// Per-item counts and per-slot records.
    pub inventory_full: InventoryFull,
    /// Recent events, newest first.
    pub recent_events: Vec<GameEvent>,
}

impl Snapshot {
    /// The newest event in this snapshot, if any.
    pub fn last_event(&self) -> Option<&GameEvent> {
        self.recent_events.first()
    }
}

/// The `/inventory` projection: summary counts plus the full inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryView {
    /// Category counts.
    pub summary: InventorySummary,
    /// Aggregate count per item identifier.
    pub counts: BTreeMap<String, u32>,
    /// Occupied slots in host order.
    pub slots: Vec<SlotItem>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_uses_fixed_wire_names() {
        let snapshot = Snapshot {
            x: 1.5,
            y: 64.0,
            z: -3.25,
            health: 20.0,
            hunger: 18,
            dimension: String::from("minecraft:overworld"),
            biome: String::from("minecraft:plains"),
            time_of_day: 13_500,
            is_night: true,
            ..Snapshot::default()
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["x"], 1.5);
        assert_eq!(json["z"], -3.25);
        assert_eq!(json["timeOfDay"], 13_500);
        assert_eq!(json["isNight"], true);
        assert!(json["blockUnderCrosshair"].is_null());
        assert!(json["selectedItem"].is_null());
        assert_eq!(json["movementVector"]["dx"], 0.0);
        assert_eq!(json["inventory"]["logs"], 0);
        assert!(json["inventoryFull"]["counts"].is_object());
        assert!(json["inventoryFull"]["slots"].is_array());
        assert!(json["recentEvents"].is_array());
    }

    #[test]
    fn total_items_sums_slots() {
        let full = InventoryFull::new(
            BTreeMap::new(),
            vec![
                SlotItem::new(0, "minecraft:oak_log", 12),
                SlotItem::new(5, "minecraft:bread", 3),
            ],
        );
        assert_eq!(full.total_items(), 15);
    }
}
