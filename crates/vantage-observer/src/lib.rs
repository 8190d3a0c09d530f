//! HTTP state API for the Vantage service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Read endpoints** (`/state`, `/inventory`, `/events`) answered from a
//!   single [`StateStore`] copy per request
//! - **Tip endpoint** (`POST /tip`) that hands a message to the producer's
//!   own turn through the tip queue and never waits for delivery
//! - **Index** (`GET /`) listing the routes and the buffered event count
//!
//! # Architecture
//!
//! Handlers hold the store lock only for the duration of one
//! `snapshot_limited` or `recent_events` call. Serialization happens on the
//! owned copy after the lock is released. Every route is wrapped in a panic
//! catcher that turns a handler fault into a 500 with a JSON `error` body.
//!
//! [`StateStore`]: vantage_core::StateStore

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod tip;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
