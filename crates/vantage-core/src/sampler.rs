//! Per-tick sampling: raw host observations into store mutations.
//!
//! The host hands over one [`PlayerSample`] per tick. [`TickSampler`]
//! remembers just enough of the previous sample to derive the movement
//! vector and to detect the discrete events the store keeps:
//!
//! | Event | Trigger |
//! |-------|---------|
//! | `damage` | health dropped below a positive previous value |
//! | `pickup` | total carried items increased |
//! | `mine_attempt` | attack held with a block under the crosshair |
//! | `attack_attempt` | attack held with an entity under the crosshair |
//! | `place_attempt` | use held |
//!
//! The first sample only establishes baselines, so it never produces
//! `damage` or `pickup` events and its movement vector is zero.

use vantage_types::{EventDraft, EventType, MovementVector, SlotItem};

use crate::classify;
use crate::store::StateStore;

/// Length of one host day in ticks.
pub const DAY_LENGTH_TICKS: u64 = 24_000;

/// First tick of the night window (inclusive).
pub const NIGHT_START: u32 = 13_000;

/// Last tick of the night window (inclusive).
pub const NIGHT_END: u32 = 23_000;

/// What the player is currently looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Crosshair {
    /// Nothing in reach.
    #[default]
    Miss,
    /// A block, by namespaced identifier.
    Block(String),
    /// Some entity.
    Entity,
}

impl Crosshair {
    /// The targeted block identifier, if a block is targeted.
    pub fn block(&self) -> Option<&str> {
        match self {
            Self::Block(id) => Some(id),
            Self::Miss | Self::Entity => None,
        }
    }
}

/// One tick of raw observation from the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSample {
    /// Position, x coordinate.
    pub x: f64,
    /// Position, y coordinate.
    pub y: f64,
    /// Position, z coordinate.
    pub z: f64,
    /// Current health.
    pub health: f32,
    /// Current food level.
    pub hunger: i32,
    /// Namespaced dimension identifier.
    pub dimension: String,
    /// Namespaced biome identifier, `None` when the host cannot resolve it.
    pub biome: Option<String>,
    /// Absolute world time in ticks (reduced modulo the day length).
    pub world_time: u64,
    /// Crosshair target.
    pub crosshair: Crosshair,
    /// Item in the main hand, `None` for an empty hand.
    pub selected_item: Option<String>,
    /// Occupied inventory slots.
    pub slots: Vec<SlotItem>,
    /// Whether the attack input is held this tick.
    pub attack_held: bool,
    /// Whether the use input is held this tick.
    pub use_held: bool,
}

/// Whether a time of day falls in the night window.
pub const fn is_night(time_of_day: u32) -> bool {
    time_of_day >= NIGHT_START && time_of_day <= NIGHT_END
}

/// Reduce an absolute world time to the time of day.
pub fn time_of_day(world_time: u64) -> u32 {
    u32::try_from(world_time % DAY_LENGTH_TICKS).unwrap_or_default()
}

/// Baselines carried from one sample to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Previous {
    x: f64,
    y: f64,
    z: f64,
    health: f32,
    total_items: u64,
}

/// Turns consecutive [`PlayerSample`]s into store updates and events.
#[derive(Debug, Default)]
pub struct TickSampler {
    previous: Option<Previous>,
}

impl TickSampler {
    /// Create a sampler with no baseline.
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Forget the baseline (e.g. after the player left the world).
    pub const fn reset(&mut self) {
        self.previous = None;
    }

    /// Write `sample` into `store` and push any detected events.
    ///
    /// Returns the kinds of the events pushed, in push order.
    pub fn apply(&mut self, sample: PlayerSample, store: &StateStore) -> Vec<EventType> {
        let total_items: u64 = sample.slots.iter().map(|s| u64::from(s.count)).sum();
        let movement = self.previous.map_or_else(MovementVector::default, |prev| {
            MovementVector::new(sample.x - prev.x, sample.y - prev.y, sample.z - prev.z)
        });

        let mut drafts = Vec::new();

        store.update_position(sample.x, sample.y, sample.z);
        store.update_movement_vector(movement);
        store.update_health(sample.health);
        store.update_hunger(sample.hunger);

        if let Some(prev) = self
            .previous
            .filter(|p| p.health > 0.0 && sample.health < p.health)
        {
            drafts.push(
                EventDraft::new(EventType::Damage)
                    .with("from", prev.health)
                    .with("to", sample.health),
            );
        }

        store.update_biome(sample.biome.unwrap_or_else(|| "unknown".to_owned()));
        store.update_dimension(sample.dimension);

        let tod = time_of_day(sample.world_time);
        store.update_time(tod, is_night(tod));

        let block = sample.crosshair.block().map(str::to_owned);
        store.update_block_under_crosshair(block.clone());
        store.update_selected_item(sample.selected_item.clone());

        store.update_inventory_summary(classify::summarize(&sample.slots));
        store.update_inventory_full(classify::aggregate_counts(&sample.slots), sample.slots);

        if let Some(prev) = self.previous.filter(|p| total_items > p.total_items) {
            let delta = i64::try_from(total_items.saturating_sub(prev.total_items))
                .unwrap_or(i64::MAX);
            drafts.push(EventDraft::new(EventType::Pickup).with("delta", delta));
        }

        if sample.attack_held {
            match sample.crosshair {
                Crosshair::Block(_) => {
                    drafts.push(EventDraft::new(EventType::MineAttempt).with("target", block));
                }
                Crosshair::Entity => {
                    drafts.push(EventDraft::new(EventType::AttackAttempt).with("target", "entity"));
                }
                Crosshair::Miss => {}
            }
        }
        if sample.use_held {
            drafts.push(EventDraft::new(EventType::PlaceAttempt).with("item", sample.selected_item));
        }

        self.previous = Some(Previous {
            x: sample.x,
            y: sample.y,
            z: sample.z,
            health: sample.health,
            total_items,
        });

        let kinds = drafts.iter().map(|d| d.event_type).collect();
        for draft in drafts {
            store.push_event(draft);
        }
        kinds
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vantage_types::{DetailValue, InventorySummary};

    use super::*;

    fn base_sample() -> PlayerSample {
        PlayerSample {
            x: 0.0,
            y: 64.0,
            z: 0.0,
            health: 20.0,
            hunger: 20,
            dimension: String::from("minecraft:overworld"),
            biome: Some(String::from("minecraft:plains")),
            world_time: 1_000,
            ..PlayerSample::default()
        }
    }

    #[test]
    fn night_window_is_inclusive() {
        assert!(!is_night(12_999));
        assert!(is_night(13_000));
        assert!(is_night(23_000));
        assert!(!is_night(23_001));
        assert_eq!(time_of_day(24_000 * 3 + 13_500), 13_500);
    }

    #[test]
    fn first_sample_sets_baseline_only() {
        let store = StateStore::default();
        let mut sampler = TickSampler::new();
        let mut sample = base_sample();
        sample.slots = vec![SlotItem::new(0, "minecraft:oak_log", 3)];

        let events = sampler.apply(sample, &store);
        assert!(events.is_empty());

        let snap = store.snapshot();
        assert_eq!(snap.movement_vector, MovementVector::default());
        assert_eq!(snap.inventory, InventorySummary::new(3, 0, 0));
        assert_eq!(snap.biome, "minecraft:plains");
        assert!(!snap.is_night);
    }

    #[test]
    fn movement_damage_and_pickup() {
        let store = StateStore::default();
        let mut sampler = TickSampler::new();
        sampler.apply(base_sample(), &store);

        let mut next = base_sample();
        next.x = 1.5;
        next.z = -2.0;
        next.health = 16.0;
        next.world_time = 37_000;
        next.slots = vec![SlotItem::new(4, "minecraft:bread", 2)];

        let events = sampler.apply(next, &store);
        assert_eq!(events, vec![EventType::Damage, EventType::Pickup]);

        let snap = store.snapshot();
        assert_eq!(snap.movement_vector, MovementVector::new(1.5, 0.0, -2.0));
        assert_eq!(snap.time_of_day, 13_000);
        assert!(snap.is_night);

        let pickup = snap.recent_events.first().unwrap();
        assert_eq!(pickup.event_type, EventType::Pickup);
        assert_eq!(pickup.detail("delta"), Some(&DetailValue::Int(2)));
        let damage = snap.recent_events.get(1).unwrap();
        assert_eq!(damage.detail("from"), Some(&DetailValue::Float(20.0)));
        assert_eq!(damage.detail("to"), Some(&DetailValue::Float(16.0)));
    }

    #[test]
    fn input_driven_events() {
        let store = StateStore::default();
        let mut sampler = TickSampler::new();

        let mut mining = base_sample();
        mining.attack_held = true;
        mining.crosshair = Crosshair::Block(String::from("minecraft:oak_log"));
        assert_eq!(sampler.apply(mining, &store), vec![EventType::MineAttempt]);
        assert_eq!(
            store.last_event().unwrap().detail("target"),
            Some(&DetailValue::Text(String::from("minecraft:oak_log")))
        );
        assert_eq!(
            store.snapshot().block_under_crosshair.as_deref(),
            Some("minecraft:oak_log")
        );

        let mut attacking = base_sample();
        attacking.attack_held = true;
        attacking.crosshair = Crosshair::Entity;
        assert_eq!(sampler.apply(attacking, &store), vec![EventType::AttackAttempt]);

        let mut placing = base_sample();
        placing.use_held = true;
        assert_eq!(sampler.apply(placing, &store), vec![EventType::PlaceAttempt]);
        assert_eq!(
            store.last_event().unwrap().detail("item"),
            Some(&DetailValue::Null)
        );

        let mut swinging = base_sample();
        swinging.attack_held = true;
        assert!(sampler.apply(swinging, &store).is_empty());
    }

    #[test]
    fn unknown_biome_and_reset() {
        let store = StateStore::default();
        let mut sampler = TickSampler::new();
        sampler.apply(base_sample(), &store);
        sampler.reset();

        let mut hurt = base_sample();
        hurt.health = 5.0;
        hurt.biome = None;
        assert!(sampler.apply(hurt, &store).is_empty());
        assert_eq!(store.snapshot().biome, "unknown");
    }
}
