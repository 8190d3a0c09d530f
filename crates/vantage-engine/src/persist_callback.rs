//! Tick callback that appends snapshots to the logs.
//!
//! File I/O runs on Tokio's blocking pool so the producer turn is never
//! stalled by a slow disk. If the previous append is still running when
//! the next one is due, the new one is skipped; the next cadence catches
//! up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tracing::debug;
use vantage_core::StateStore;
use vantage_core::runner::TickCallback;
use vantage_persist::FileLogger;

/// Clears the in-flight flag when dropped, including during a panic
/// unwind out of the append.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Callback that bridges the producer cadence to the snapshot logs.
pub struct PersistCallback {
    logger: Arc<FileLogger>,
    runtime: Handle,
    in_flight: Arc<AtomicBool>,
}

impl PersistCallback {
    /// Create a callback that writes through `logger` on `runtime`'s
    /// blocking pool.
    pub fn new(logger: Arc<FileLogger>, runtime: Handle) -> Self {
        Self {
            logger,
            runtime,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether no append is currently running.
    pub fn is_idle(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }
}

impl TickCallback for PersistCallback {
    fn on_persist(&mut self, tick: u64, store: &Arc<StateStore>) {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!(tick, "Previous snapshot append still running, skipping");
            return;
        }

        let logger = Arc::clone(&self.logger);
        let store = Arc::clone(store);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        // Dropping the handle detaches the task.
        drop(self.runtime.spawn_blocking(move || {
            let report = logger.append(&store);
            drop(guard);
            debug!(
                tick,
                csv_written = report.csv_written,
                jsonl_written = report.jsonl_written,
                "Snapshot appended"
            );
        }));
    }
}
