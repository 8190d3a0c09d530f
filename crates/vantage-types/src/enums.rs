//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The kind of discrete occurrence recorded in the recent-event buffer.
///
/// The vocabulary is deliberately small: the producer only classifies
/// what it can observe from a single tick of host input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EventType {
    /// The attack input was held while a block was under the crosshair.
    MineAttempt,
    /// The use input was held.
    PlaceAttempt,
    /// The attack input was held while an entity was under the crosshair.
    AttackAttempt,
    /// Health dropped since the previous tick.
    Damage,
    /// The total number of carried items increased.
    Pickup,
}

impl EventType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::MineAttempt,
        Self::PlaceAttempt,
        Self::AttackAttempt,
        Self::Damage,
        Self::Pickup,
    ];

    /// The wire name of this event type (e.g. `mine_attempt`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MineAttempt => "mine_attempt",
            Self::PlaceAttempt => "place_attempt",
            Self::AttackAttempt => "attack_attempt",
            Self::Damage => "damage",
            Self::Pickup => "pickup",
        }
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
