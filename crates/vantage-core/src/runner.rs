//! Producer run loop.
//!
//! [`Producer`] is the store's single writer. Each turn it:
//!
//! 1. delivers queued tips to the host,
//! 2. samples the host and feeds the [`TickSampler`],
//! 3. every `persist_every_ticks` sampled ticks, hands the store to the
//!    [`TickCallback`] (the persister hook).
//!
//! [`Producer::run`] repeats turns on a fixed interval until the shutdown
//! signal flips. Turns never overlap.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use vantage_types::EventType;

use crate::command::TipReceiver;
use crate::config::ProducerConfig;
use crate::sampler::{PlayerSample, TickSampler};
use crate::store::StateStore;

/// Failures reported by a host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// This tick could not be sampled; the next one may succeed.
    #[error("sample unavailable: {0}")]
    Transient(String),

    /// The host is gone for good.
    #[error("host disconnected: {0}")]
    Disconnected(String),
}

/// Errors that end the producer loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The host disconnected.
    #[error("host error: {source}")]
    Host {
        /// The underlying host error.
        #[from]
        source: HostError,
    },
}

/// The environment the producer samples and delivers tips to.
pub trait HostSource: Send {
    /// Observe the current tick. `Ok(None)` means no player is present.
    fn sample(&mut self) -> Result<Option<PlayerSample>, HostError>;

    /// Show a tip line to the player.
    fn deliver_tip(&mut self, line: &str);
}

/// Hook invoked on the persistence cadence.
pub trait TickCallback: Send {
    /// Called every `persist_every_ticks` sampled ticks.
    fn on_persist(&mut self, tick: u64, store: &Arc<StateStore>);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_persist(&mut self, _tick: u64, _store: &Arc<StateStore>) {}
}

/// What a single turn did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The tick number of this turn (1-based).
    pub tick: u64,
    /// Whether a player sample was written to the store.
    pub sampled: bool,
    /// Events pushed this turn.
    pub events: Vec<EventType>,
    /// Tips handed to the host this turn.
    pub tips_delivered: usize,
    /// Whether the persistence callback ran.
    pub persisted: bool,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Turns executed.
    pub total_ticks: u64,
    /// Turns with a player sample.
    pub sampled_ticks: u64,
    /// Tips handed to the host.
    pub tips_delivered: u64,
    /// Persistence callbacks made.
    pub persist_calls: u64,
}

impl RunSummary {
    fn record(&mut self, outcome: &TurnOutcome) {
        self.total_ticks = self.total_ticks.saturating_add(1);
        if outcome.sampled {
            self.sampled_ticks = self.sampled_ticks.saturating_add(1);
        }
        self.tips_delivered = self
            .tips_delivered
            .saturating_add(u64::try_from(outcome.tips_delivered).unwrap_or(u64::MAX));
        if outcome.persisted {
            self.persist_calls = self.persist_calls.saturating_add(1);
        }
    }
}

/// The store's single writer.
pub struct Producer<H, C> {
    host: H,
    callback: C,
    store: Arc<StateStore>,
    tips: TipReceiver,
    sampler: TickSampler,
    tick_interval: Duration,
    persist_every_ticks: u64,
    tick: u64,
}

impl<H: HostSource, C: TickCallback> Producer<H, C> {
    /// Assemble a producer writing into `store`.
    pub fn new(
        host: H,
        callback: C,
        store: Arc<StateStore>,
        tips: TipReceiver,
        config: &ProducerConfig,
    ) -> Self {
        Self {
            host,
            callback,
            store,
            tips,
            sampler: TickSampler::new(),
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            persist_every_ticks: config.persist_every_ticks,
            tick: 0,
        }
    }

    /// The host being sampled.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Run one producer turn.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Host`] if the host reports a disconnect.
    /// Transient sampling failures are logged and the turn is skipped.
    pub fn turn(&mut self) -> Result<TurnOutcome, RunnerError> {
        self.tick = self.tick.saturating_add(1);
        let mut outcome = TurnOutcome {
            tick: self.tick,
            ..TurnOutcome::default()
        };

        for tip in self.tips.drain() {
            debug!(tick = self.tick, message = %tip.message, "Delivering tip");
            self.host.deliver_tip(&tip.chat_line());
            outcome.tips_delivered = outcome.tips_delivered.saturating_add(1);
        }

        let sample = match self.host.sample() {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                self.sampler.reset();
                return Ok(outcome);
            }
            Err(HostError::Transient(reason)) => {
                warn!(tick = self.tick, reason = %reason, "Skipping tick, host sample unavailable");
                return Ok(outcome);
            }
            Err(e @ HostError::Disconnected(_)) => return Err(e.into()),
        };

        outcome.events = self.sampler.apply(sample, &self.store);
        outcome.sampled = true;

        if self.tick.checked_rem(self.persist_every_ticks) == Some(0) {
            self.callback.on_persist(self.tick, &self.store);
            outcome.persisted = true;
        }

        Ok(outcome)
    }

    /// Run turns on the configured interval until `shutdown` becomes `true`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Host`] if the host disconnects.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::default();
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            tick_interval_ms = u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX),
            persist_every_ticks = self.persist_every_ticks,
            "Producer starting"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {
                    let outcome = self.turn()?;
                    summary.record(&outcome);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!(
            total_ticks = summary.total_ticks,
            sampled_ticks = summary.sampled_ticks,
            tips_delivered = summary.tips_delivered,
            persist_calls = summary.persist_calls,
            "Producer stopped"
        );
        Ok(summary)
    }
}
