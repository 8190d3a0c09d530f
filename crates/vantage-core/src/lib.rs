//! State store, snapshot codec, and producer loop for the Vantage service.
//!
//! This crate owns the only shared mutable state in the system, the
//! [`StateStore`], and the single writer that feeds it once per tick.
//!
//! # Modules
//!
//! - [`store`] -- Current host state plus the bounded recent-event buffer.
//! - [`codec`] -- Pure conversions from store internals to owned views.
//! - [`classify`] -- Static item classification table.
//! - [`sampler`] -- Per-tick host observations into store mutations and events.
//! - [`command`] -- Fire-and-forget tip queue into the producer's turn.
//! - [`runner`] -- The producer loop: tips, sampling, persistence cadence.
//! - [`config`] -- YAML configuration with environment overrides.
//!
//! [`StateStore`]: store::StateStore

pub mod classify;
pub mod codec;
pub mod command;
pub mod config;
pub mod runner;
pub mod sampler;
pub mod store;

pub use command::{TipCommand, TipDelivery, TipReceiver, TipSender, tip_channel};
pub use config::{ConfigError, VantageConfig};
pub use runner::{HostError, HostSource, Producer, RunSummary, RunnerError, TickCallback};
pub use sampler::{Crosshair, PlayerSample, TickSampler};
pub use store::{DEFAULT_EVENT_CAPACITY, MIN_EVENT_CAPACITY, StateStore};
