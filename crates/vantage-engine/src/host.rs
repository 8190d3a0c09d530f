//! Simulated host for running the service without a game client.
//!
//! [`SimulatedHost`] produces a plausible stream of player samples: a
//! random walk on the surface, health that dips and regenerates, hunger
//! that slowly drains, a day/night clock, a rotating biome, an inventory
//! that grows over time, and occasional attack/use input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use vantage_core::{Crosshair, HostError, HostSource, PlayerSample};
use vantage_types::SlotItem;

const BIOMES: [&str; 5] = [
    "minecraft:plains",
    "minecraft:forest",
    "minecraft:birch_forest",
    "minecraft:taiga",
    "minecraft:river",
];

const LOOT: [&str; 6] = [
    "minecraft:oak_log",
    "minecraft:oak_planks",
    "minecraft:birch_log",
    "minecraft:bread",
    "minecraft:apple",
    "minecraft:cobblestone",
];

const BLOCKS: [&str; 4] = [
    "minecraft:oak_log",
    "minecraft:grass_block",
    "minecraft:stone",
    "minecraft:dirt",
];

const MAX_HEALTH: f32 = 20.0;
const MAX_HUNGER: i32 = 20;
const MAX_STACK: u32 = 64;
const INVENTORY_SLOTS: usize = 36;

/// Ticks between biome changes.
const BIOME_PERIOD: u64 = 600;
/// Ticks between item pickups.
const LOOT_PERIOD: u64 = 100;
/// Ticks between hunger drops.
const HUNGER_PERIOD: u64 = 200;

/// A random-walk stand-in for the game client.
#[derive(Debug)]
pub struct SimulatedHost {
    rng: StdRng,
    ticks: u64,
    x: f64,
    y: f64,
    z: f64,
    health: f32,
    hunger: i32,
    world_time: u64,
    slots: Vec<SlotItem>,
    delivered: Vec<String>,
}

impl SimulatedHost {
    /// Create a host seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Create a reproducible host.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            ticks: 0,
            x: 0.0,
            y: 64.0,
            z: 0.0,
            health: MAX_HEALTH,
            hunger: MAX_HUNGER,
            world_time: 0,
            slots: Vec::new(),
            delivered: Vec::new(),
        }
    }

    /// Tip lines shown to the simulated player so far.
    pub fn delivered(&self) -> &[String] {
        &self.delivered
    }

    fn step_vitals(&mut self) {
        if self.rng.random_bool(0.01) {
            let hit: f32 = self.rng.random_range(1.0..4.0);
            self.health = (self.health - hit).max(0.0);
        } else if self.hunger > 6 {
            self.health = (self.health + 0.05).min(MAX_HEALTH);
        }

        if self.health <= 0.0 {
            // Respawn.
            self.health = MAX_HEALTH;
            self.hunger = MAX_HUNGER;
            self.x = 0.0;
            self.z = 0.0;
        }

        if self.ticks.checked_rem(HUNGER_PERIOD) == Some(0) {
            self.hunger = self.hunger.saturating_sub(1).max(0);
        }
        if self.hunger == 0 {
            self.hunger = MAX_HUNGER;
        }
    }

    fn pick_up(&mut self) {
        let Some(item) = LOOT.get(self.rng.random_range(0..LOOT.len())) else {
            return;
        };
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.item == *item && s.count < MAX_STACK)
        {
            slot.count = slot.count.saturating_add(1);
        } else if self.slots.len() < INVENTORY_SLOTS {
            let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(SlotItem::new(index, *item, 1));
        }
    }

    fn crosshair(&mut self) -> Crosshair {
        match self.rng.random_range(0..10_u8) {
            0..=4 => BLOCKS
                .get(self.rng.random_range(0..BLOCKS.len()))
                .map_or(Crosshair::Miss, |b| Crosshair::Block((*b).to_owned())),
            5 => Crosshair::Entity,
            _ => Crosshair::Miss,
        }
    }

    fn biome(&self) -> String {
        let period = usize::try_from(self.ticks.checked_div(BIOME_PERIOD).unwrap_or_default())
            .unwrap_or_default();
        let index = period.checked_rem(BIOMES.len()).unwrap_or_default();
        BIOMES.get(index).copied().unwrap_or("minecraft:plains").to_owned()
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSource for SimulatedHost {
    fn sample(&mut self) -> Result<Option<PlayerSample>, HostError> {
        self.ticks = self.ticks.saturating_add(1);
        self.world_time = self.world_time.saturating_add(1);

        self.x += self.rng.random_range(-0.3..0.3);
        self.z += self.rng.random_range(-0.3..0.3);
        self.y = 64.0 + (self.x * 0.05).sin() * 2.0;

        self.step_vitals();
        if self.ticks.checked_rem(LOOT_PERIOD) == Some(0) {
            self.pick_up();
        }

        let crosshair = self.crosshair();
        let selected_item = self.slots.first().map(|s| s.item.clone());

        Ok(Some(PlayerSample {
            x: self.x,
            y: self.y,
            z: self.z,
            health: self.health,
            hunger: self.hunger,
            dimension: String::from("minecraft:overworld"),
            biome: Some(self.biome()),
            world_time: self.world_time,
            crosshair,
            selected_item,
            slots: self.slots.clone(),
            attack_held: self.rng.random_bool(0.05),
            use_held: self.rng.random_bool(0.02),
        }))
    }

    fn deliver_tip(&mut self, line: &str) {
        info!(line, "Tip shown to player");
        self.delivered.push(line.to_owned());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_range() {
        let mut host = SimulatedHost::seeded(7);
        for _ in 0..5_000 {
            let sample = host.sample().unwrap().unwrap();
            assert!((0.0..=MAX_HEALTH).contains(&sample.health));
            assert!((0..=MAX_HUNGER).contains(&sample.hunger));
            assert!(sample.slots.len() <= INVENTORY_SLOTS);
            assert!(BIOMES.contains(&sample.biome.as_deref().unwrap()));
            assert!(sample.slots.iter().all(|s| s.count <= MAX_STACK));
        }
    }

    #[test]
    fn inventory_grows() {
        let mut host = SimulatedHost::seeded(1);
        let mut last = None;
        for _ in 0..LOOT_PERIOD * 3 {
            last = host.sample().unwrap();
        }
        let total: u32 = last.unwrap().slots.iter().map(|s| s.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn same_seed_same_walk() {
        let mut a = SimulatedHost::seeded(42);
        let mut b = SimulatedHost::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.sample().unwrap(), b.sample().unwrap());
        }
    }

    #[test]
    fn tips_are_recorded() {
        let mut host = SimulatedHost::seeded(3);
        host.deliver_tip("[TIP] Eat something");
        assert_eq!(host.delivered(), ["[TIP] Eat something"]);
    }
}
