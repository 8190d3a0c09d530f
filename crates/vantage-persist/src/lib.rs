//! Snapshot logs for offline consumption.
//!
//! Every call to [`FileLogger::append`] takes one snapshot from the store
//! and appends one line to each of two files:
//!
//! ```text
//! StateStore::snapshot()
//!     |
//!     +-- state.csv    (tabular, header written once)
//!     +-- state.jsonl  (one {timestamp, state, lastEvent} object per line)
//! ```
//!
//! The logs are append-only and owned by the logger. A failure on one file
//! is logged and does not stop the write to the other.
//!
//! # Modules
//!
//! - [`csv`] -- Header, field escaping, and row encoding
//! - [`snapshot_log`] -- The two-file appender
//! - [`error`] -- Shared error types

pub mod csv;
pub mod error;
pub mod snapshot_log;

// Re-export primary types for convenience.
pub use error::PersistError;
pub use snapshot_log::{AppendReport, FileLogger};
