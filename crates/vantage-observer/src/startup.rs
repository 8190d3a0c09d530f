//! State API startup helper for embedding in the engine binary.
//!
//! Provides [`spawn_observer`] which launches the HTTP server on a
//! background Tokio task so it runs alongside the producer loop.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vantage_observer::startup::spawn_observer;
//! use vantage_observer::{AppState, ServerConfig};
//!
//! let state = Arc::new(AppState::new(store, tips));
//! let handle = spawn_observer(ServerConfig::default(), state, shutdown_rx)?;
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the state API server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the state API server on a background Tokio task.
///
/// The address is validated before spawning so an obvious
/// misconfiguration fails the caller instead of the background task.
/// Bind and serve failures after that point are logged by the task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if `config` does not form a valid
/// socket address.
pub fn spawn_observer(
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown: watch::Receiver<bool>,
) -> Result<JoinHandle<()>, StartupError> {
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state, shutdown).await {
            tracing::error!(error = %e, "State API exited with error");
        }
    });

    tracing::info!(%addr, "State API spawned on background task");

    Ok(handle)
}
