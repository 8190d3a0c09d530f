//! Configuration loading and typed config structures for the Vantage service.
//!
//! The configuration lives in a YAML file (by default
//! `vantage-config.yaml`). Every section and field has a default, so an
//! empty or missing file yields a working configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::store::DEFAULT_EVENT_CAPACITY;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VantageConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// State store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Producer loop cadence and tip queue sizing.
    #[serde(default)]
    pub producer: ProducerConfig,

    /// Snapshot log files.
    #[serde(default)]
    pub persist: PersistConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VantageConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `VANTAGE_HOST` overrides `server.host`
    /// - `VANTAGE_PORT` overrides `server.port`
    /// - `VANTAGE_LOG_DIR` overrides `persist.log_dir`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override values from the environment, read through `lookup`.
    ///
    /// Unparseable port values are ignored with a warning.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("VANTAGE_HOST") {
            self.server.host = host;
        }
        if let Some(raw) = lookup("VANTAGE_PORT") {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring invalid VANTAGE_PORT"),
            }
        }
        if let Some(dir) = lookup("VANTAGE_LOG_DIR") {
            self.persist.log_dir = PathBuf::from(dir);
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of events embedded in `GET /state`.
    #[serde(default = "default_state_event_cap")]
    pub state_event_cap: usize,

    /// Number of events `GET /events` returns without a usable `n`.
    #[serde(default = "default_event_count")]
    pub default_event_count: i64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            state_event_cap: default_state_event_cap(),
            default_event_count: default_event_count(),
        }
    }
}

/// State store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Recent-event buffer capacity (raised to the store's floor if lower).
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            event_capacity: default_event_capacity(),
        }
    }
}

/// Producer loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProducerConfig {
    /// Milliseconds between producer ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Hand a snapshot to the persister every N ticks (0 disables).
    #[serde(default = "default_persist_every_ticks")]
    pub persist_every_ticks: u64,

    /// Maximum number of undelivered tips held for the producer.
    #[serde(default = "default_tip_queue_capacity")]
    pub tip_queue_capacity: usize,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            persist_every_ticks: default_persist_every_ticks(),
            tip_queue_capacity: default_tip_queue_capacity(),
        }
    }
}

/// Snapshot log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistConfig {
    /// Whether snapshot logs are written at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory holding both log files.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Tabular log file name.
    #[serde(default = "default_csv_file")]
    pub csv_file: String,

    /// Line-delimited JSON log file name.
    #[serde(default = "default_jsonl_file")]
    pub jsonl_file: String,
}

impl PersistConfig {
    /// Full path of the tabular log.
    pub fn csv_path(&self) -> PathBuf {
        self.log_dir.join(&self.csv_file)
    }

    /// Full path of the line-delimited JSON log.
    pub fn jsonl_path(&self) -> PathBuf {
        self.log_dir.join(&self.jsonl_file)
    }
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: default_log_dir(),
            csv_file: default_csv_file(),
            jsonl_file: default_jsonl_file(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit one JSON object per log line instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_state_event_cap() -> usize {
    64
}

const fn default_event_count() -> i64 {
    20
}

const fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

const fn default_tick_interval_ms() -> u64 {
    50
}

const fn default_persist_every_ticks() -> u64 {
    20
}

const fn default_tip_queue_capacity() -> usize {
    64
}

const fn default_true() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("vantage-logs")
}

fn default_csv_file() -> String {
    "state.csv".to_owned()
}

fn default_jsonl_file() -> String {
    "state.jsonl".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = VantageConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.state_event_cap, 64);
        assert_eq!(config.server.default_event_count, 20);
        assert_eq!(config.store.event_capacity, 256);
        assert_eq!(config.producer.persist_every_ticks, 20);
        assert!(config.persist.enabled);
        assert_eq!(
            config.persist.csv_path(),
            PathBuf::from("vantage-logs").join("state.csv")
        );
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = VantageConfig::parse("   \n").unwrap();
        assert_eq!(config, VantageConfig::default());
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r"
server:
  port: 9090
store:
  event_capacity: 512
persist:
  log_dir: /tmp/vantage
  enabled: false
logging:
  json: true
";
        let config = VantageConfig::parse(yaml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.event_capacity, 512);
        assert!(!config.persist.enabled);
        assert_eq!(
            config.persist.jsonl_path(),
            PathBuf::from("/tmp/vantage").join("state.jsonl")
        );
        assert_eq!(config.producer.tick_interval_ms, 50);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = VantageConfig::parse("server: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = VantageConfig::default();
        config.apply_env_overrides(|key| match key {
            "VANTAGE_PORT" => Some("7070".to_owned()),
            "VANTAGE_LOG_DIR" => Some("/var/log/vantage".to_owned()),
            _ => None,
        });
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.persist.log_dir, PathBuf::from("/var/log/vantage"));
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut config = VantageConfig::default();
        config.apply_env_overrides(|key| (key == "VANTAGE_PORT").then(|| "not-a-port".to_owned()));
        assert_eq!(config.server.port, 8080);
    }
}
