//! Error types for the snapshot logs.

use std::path::PathBuf;

/// Errors that can occur while appending to a snapshot log.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Creating, opening, or writing a log file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A value could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PersistError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
