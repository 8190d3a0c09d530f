//! Static item classification table.
//!
//! Maps namespaced item identifiers onto the three tracked categories. The
//! store never sees this table; the sampler folds slots into an
//! [`InventorySummary`] before handing it over.

use std::collections::BTreeMap;

use vantage_types::{InventorySummary, SlotItem};

/// The tracked inventory categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    /// Logs and nether stems.
    Log,
    /// Wooden planks.
    Plank,
    /// Edible items.
    Food,
}

const LOGS: &[&str] = &[
    "minecraft:oak_log",
    "minecraft:spruce_log",
    "minecraft:birch_log",
    "minecraft:jungle_log",
    "minecraft:acacia_log",
    "minecraft:dark_oak_log",
    "minecraft:mangrove_log",
    "minecraft:cherry_log",
    "minecraft:crimson_stem",
    "minecraft:warped_stem",
];

const PLANKS: &[&str] = &[
    "minecraft:oak_planks",
    "minecraft:spruce_planks",
    "minecraft:birch_planks",
    "minecraft:jungle_planks",
    "minecraft:acacia_planks",
    "minecraft:dark_oak_planks",
    "minecraft:mangrove_planks",
    "minecraft:cherry_planks",
    "minecraft:crimson_planks",
    "minecraft:warped_planks",
];

const FOODS: &[&str] = &[
    "minecraft:bread",
    "minecraft:apple",
    "minecraft:carrot",
    "minecraft:baked_potato",
    "minecraft:cooked_beef",
    "minecraft:cooked_porkchop",
    "minecraft:cooked_chicken",
    "minecraft:cooked_mutton",
    "minecraft:cooked_rabbit",
    "minecraft:cooked_cod",
    "minecraft:cooked_salmon",
    "minecraft:golden_carrot",
];

/// Classify one item identifier.
pub fn category_of(item: &str) -> Option<ItemCategory> {
    if LOGS.contains(&item) {
        Some(ItemCategory::Log)
    } else if PLANKS.contains(&item) {
        Some(ItemCategory::Plank)
    } else if FOODS.contains(&item) {
        Some(ItemCategory::Food)
    } else {
        None
    }
}

/// Fold occupied slots into category counts.
pub fn summarize(slots: &[SlotItem]) -> InventorySummary {
    slots
        .iter()
        .fold(InventorySummary::default(), |mut summary, slot| {
            match category_of(&slot.item) {
                Some(ItemCategory::Log) => summary.logs = summary.logs.saturating_add(slot.count),
                Some(ItemCategory::Plank) => {
                    summary.planks = summary.planks.saturating_add(slot.count);
                }
                Some(ItemCategory::Food) => summary.foods = summary.foods.saturating_add(slot.count),
                None => {}
            }
            summary
        })
}

/// Aggregate stack sizes per item identifier.
pub fn aggregate_counts(slots: &[SlotItem]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for slot in slots {
        let entry: &mut u32 = counts.entry(slot.item.clone()).or_default();
        *entry = entry.saturating_add(slot.count);
    }
    counts
}
