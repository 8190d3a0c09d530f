//! Engine binary for the Vantage state service.
//!
//! This is the main entry point that wires together the state store, the
//! producer loop, the HTTP state API, and the snapshot logs. It loads
//! configuration, starts every subsystem, and runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `VANTAGE_CONFIG` or `vantage-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the shared state store and the tip queue
//! 4. Start the state API on a background task
//! 5. Run the producer loop against the simulated host
//! 6. On shutdown, write one final snapshot and stop the API

mod error;
mod host;
mod persist_callback;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vantage_core::config::LoggingConfig;
use vantage_core::runner::{NoOpCallback, TickCallback};
use vantage_core::{Producer, RunSummary, StateStore, TipReceiver, VantageConfig, tip_channel};
use vantage_observer::{AppState, ServerConfig};
use vantage_persist::FileLogger;

use crate::error::EngineError;
use crate::host::SimulatedHost;
use crate::persist_callback::PersistCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "vantage-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the state API cannot be
/// started, or the producer loop fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("vantage-engine starting");
    info!(
        host = %config.server.host,
        port = config.server.port,
        event_capacity = config.store.event_capacity,
        tick_interval_ms = config.producer.tick_interval_ms,
        persist_every_ticks = config.producer.persist_every_ticks,
        persist_enabled = config.persist.enabled,
        "Configuration loaded"
    );

    // 3. Shared store and tip queue.
    let store = Arc::new(StateStore::new(config.store.event_capacity));
    let (tips_tx, tips_rx) = tip_channel(config.producer.tip_queue_capacity);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // 4. State API.
    let app_state = Arc::new(AppState::with_settings(
        Arc::clone(&store),
        tips_tx,
        &config.server,
    ));
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let observer_handle =
        vantage_observer::startup::spawn_observer(server_config, app_state, shutdown_rx.clone())
            .map_err(EngineError::from)?;

    // Ctrl-C flips the shutdown signal for both the producer and the API.
    let ctrl_c_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
        }
        let _ = ctrl_c_tx.send(true);
    });

    // 5. Producer loop.
    let logger = config.persist.enabled.then(|| {
        Arc::new(FileLogger::new(
            config.persist.csv_path(),
            config.persist.jsonl_path(),
        ))
    });

    let result = match &logger {
        Some(logger) => {
            info!(
                csv = %logger.csv_path().display(),
                jsonl = %logger.jsonl_path().display(),
                "Snapshot logs enabled"
            );
            let callback = PersistCallback::new(Arc::clone(logger), Handle::current());
            run_producer(callback, &store, tips_rx, &config, shutdown_rx).await
        }
        None => {
            info!("Snapshot logs disabled");
            run_producer(NoOpCallback, &store, tips_rx, &config, shutdown_rx).await
        }
    };

    // The producer may stop on its own (host failure); the API must follow.
    if let Err(e) = &result {
        error!(error = %e, "Producer loop failed, shutting down");
    }
    let _ = shutdown_tx.send(true);

    // 6. Final snapshot, then wait for the API to drain.
    if let Some(logger) = logger {
        let final_store = Arc::clone(&store);
        let report = tokio::task::spawn_blocking(move || logger.append(&final_store))
            .await
            .map_err(|e| EngineError::Task {
                message: format!("final snapshot append: {e}"),
            })?;
        info!(
            csv_written = report.csv_written,
            jsonl_written = report.jsonl_written,
            "Final snapshot written"
        );
    }

    if let Err(e) = observer_handle.await {
        warn!(error = %e, "State API task ended abnormally");
    }

    let summary = result?;
    info!(
        total_ticks = summary.total_ticks,
        sampled_ticks = summary.sampled_ticks,
        tips_delivered = summary.tips_delivered,
        persist_calls = summary.persist_calls,
        "vantage-engine stopped"
    );

    Ok(())
}

/// Run the producer against a simulated host until shutdown.
async fn run_producer<C: TickCallback>(
    callback: C,
    store: &Arc<StateStore>,
    tips: TipReceiver,
    config: &VantageConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<RunSummary, EngineError> {
    let producer = Producer::new(
        SimulatedHost::new(),
        callback,
        Arc::clone(store),
        tips,
        &config.producer,
    );
    Ok(producer.run(shutdown).await?)
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load configuration from `VANTAGE_CONFIG` or the default path.
///
/// If the file does not exist, defaults are used (with environment
/// overrides still applied).
fn load_config() -> Result<VantageConfig, EngineError> {
    let config_path = std::env::var_os("VANTAGE_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if config_path.exists() {
        Ok(VantageConfig::from_file(&config_path)?)
    } else {
        let mut config = VantageConfig::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }
}
