//! Append-only snapshot logs.
//!
//! [`FileLogger`] writes one tabular row and one JSON line per call. Each
//! file is opened in append mode and written with a single `write_all` per
//! line. Failures are reported through `tracing` and swallowed: a missed
//! log line must never interrupt the producer.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use vantage_core::StateStore;
use vantage_types::{GameEvent, Snapshot};

use crate::csv;
use crate::error::PersistError;

/// One line of the JSONL log.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRecord<'a> {
    timestamp: &'a str,
    state: &'a Snapshot,
    last_event: Option<&'a GameEvent>,
}

/// Which of the two logs accepted the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendReport {
    /// The tabular row was written.
    pub csv_written: bool,
    /// The JSON line was written.
    pub jsonl_written: bool,
}

/// Writer for the tabular and line-delimited snapshot logs.
#[derive(Debug)]
pub struct FileLogger {
    csv_path: PathBuf,
    jsonl_path: PathBuf,
    // Appends from overlapping blocking tasks are serialized.
    write_lock: Mutex<()>,
}

impl FileLogger {
    /// Create a logger for the two given files. Nothing is touched on disk yet.
    pub fn new(csv_path: impl Into<PathBuf>, jsonl_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            jsonl_path: jsonl_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the tabular log.
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Path of the line-delimited JSON log.
    pub fn jsonl_path(&self) -> &Path {
        &self.jsonl_path
    }

    /// Take one snapshot from `store` and append it to both logs.
    ///
    /// The store lock is held only while the snapshot is copied.
    pub fn append(&self, store: &StateStore) -> AppendReport {
        let snapshot = store.snapshot();
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.append_snapshot(&timestamp, &snapshot)
    }

    /// Append an already-taken snapshot to both logs.
    pub fn append_snapshot(&self, timestamp: &str, snapshot: &Snapshot) -> AppendReport {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let csv_written = match self.write_csv(timestamp, snapshot) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, path = %self.csv_path.display(), "Failed writing CSV log");
                false
            }
        };

        let jsonl_written = match self.write_jsonl(timestamp, snapshot) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, path = %self.jsonl_path.display(), "Failed writing JSONL log");
                false
            }
        };

        debug!(csv_written, jsonl_written, "Snapshot appended");
        AppendReport {
            csv_written,
            jsonl_written,
        }
    }

    fn write_csv(&self, timestamp: &str, snapshot: &Snapshot) -> Result<(), PersistError> {
        let row = csv::encode_row(timestamp, snapshot)?;
        self.write_header_if_needed()?;
        append_line(&self.csv_path, &row)
    }

    fn write_jsonl(&self, timestamp: &str, snapshot: &Snapshot) -> Result<(), PersistError> {
        let record = JsonRecord {
            timestamp,
            state: snapshot,
            last_event: snapshot.last_event(),
        };
        let line = serde_json::to_string(&record)?;
        append_line(&self.jsonl_path, &line)
    }

    fn write_header_if_needed(&self) -> Result<(), PersistError> {
        match fs::metadata(&self.csv_path) {
            Ok(meta) if meta.len() > 0 => Ok(()),
            Ok(_) => append_line(&self.csv_path, csv::CSV_HEADER),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                append_line(&self.csv_path, csv::CSV_HEADER)
            }
            Err(e) => Err(PersistError::io(&self.csv_path, e)),
        }
    }
}

/// Append `line` plus a newline, creating the file and its directory.
fn append_line(path: &Path, line: &str) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
    }

    let mut buf = String::with_capacity(line.len().saturating_add(1));
    buf.push_str(line);
    buf.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PersistError::io(path, e))?;
    file.write_all(buf.as_bytes())
        .map_err(|e| PersistError::io(path, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vantage_types::{EventDraft, EventType};

    use super::*;

    fn populated_store() -> StateStore {
        let store = StateStore::default();
        store.update_position(10.0, 70.0, -5.0);
        store.update_health(20.0);
        store.update_biome("minecraft:plains");
        store.update_dimension("minecraft:overworld");
        store
    }

    #[test]
    fn header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let logger = FileLogger::new(
            dir.path().join("logs/state.csv"),
            dir.path().join("logs/state.jsonl"),
        );
        let store = populated_store();

        logger.append(&store);
        logger.append(&store);

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.first().copied(), Some(csv::CSV_HEADER));
        assert_eq!(contents.matches(csv::CSV_HEADER).count(), 1);
    }

    #[test]
    fn jsonl_lines_are_self_contained() {
        let dir = tempfile::tempdir().unwrap();
        let logger = FileLogger::new(dir.path().join("state.csv"), dir.path().join("state.jsonl"));
        let store = populated_store();

        logger.append(&store);
        store.push_event(EventDraft::new(EventType::Pickup).with("delta", 3_i64));
        logger.append(&store);

        let jsonl = fs::read_to_string(logger.jsonl_path()).unwrap();
        let records: Vec<serde_json::Value> = jsonl
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);

        let first = records.first().unwrap();
        assert!(first["timestamp"].is_string());
        assert_eq!(first["state"]["biome"], "minecraft:plains");
        assert!(first["lastEvent"].is_null());

        let second = records.get(1).unwrap();
        assert_eq!(second["lastEvent"]["type"], "pickup");
        assert_eq!(second["state"]["recentEvents"][0]["details"]["delta"], 3);
    }

    #[test]
    fn empty_existing_csv_gets_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("state.csv");
        fs::write(&csv_path, "").unwrap();
        let logger = FileLogger::new(&csv_path, dir.path().join("state.jsonl"));

        logger.append(&populated_store());
        let contents = fs::read_to_string(&csv_path).unwrap();
        assert!(contents.starts_with(csv::CSV_HEADER));
    }

    #[test]
    fn failure_on_one_log_does_not_block_the_other() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the CSV file should be makes every CSV write fail.
        let csv_path = dir.path().join("blocked.csv");
        fs::create_dir_all(&csv_path).unwrap();
        let logger = FileLogger::new(&csv_path, dir.path().join("state.jsonl"));
        let store = populated_store();

        let first = logger.append(&store);
        assert!(!first.csv_written);
        assert!(first.jsonl_written);

        let second = logger.append(&store);
        assert!(second.jsonl_written);
        let jsonl = fs::read_to_string(logger.jsonl_path()).unwrap();
        assert_eq!(jsonl.lines().count(), 2);

        // Once the obstruction is gone, CSV appends resume.
        fs::remove_dir(&csv_path).unwrap();
        let third = logger.append(&store);
        assert!(third.csv_written);
    }
}
