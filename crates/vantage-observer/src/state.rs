//! Shared application state for the state API.
//!
//! [`AppState`] bundles the shared [`StateStore`], the submitting half of
//! the tip queue, and the two read limits the handlers apply.

use std::sync::Arc;

use vantage_core::config::ServerSettings;
use vantage_core::{StateStore, TipSender};

/// Events included in `GET /state` when no setting overrides it.
pub const DEFAULT_STATE_EVENT_CAP: i64 = 64;

/// Events returned by `GET /events` when `n` is absent or unparsable.
pub const DEFAULT_EVENT_COUNT: i64 = 20;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// store is read-only from here; the only side effect a request can
/// cause is a queued tip.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The live state store, written by the producer.
    pub store: Arc<StateStore>,
    /// Tip queue into the producer's turn.
    pub tips: TipSender,
    /// Event cap applied to `GET /state`.
    pub state_event_cap: i64,
    /// Fallback count for `GET /events`.
    pub default_event_count: i64,
}

impl AppState {
    /// Create application state with the default read limits.
    pub const fn new(store: Arc<StateStore>, tips: TipSender) -> Self {
        Self {
            store,
            tips,
            state_event_cap: DEFAULT_STATE_EVENT_CAP,
            default_event_count: DEFAULT_EVENT_COUNT,
        }
    }

    /// Create application state with read limits taken from `settings`.
    pub fn with_settings(
        store: Arc<StateStore>,
        tips: TipSender,
        settings: &ServerSettings,
    ) -> Self {
        Self {
            store,
            tips,
            state_event_cap: i64::try_from(settings.state_event_cap).unwrap_or(i64::MAX),
            default_event_count: settings.default_event_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use vantage_core::tip_channel;

    use super::*;

    #[test]
    fn settings_are_applied() {
        let (tips, _rx) = tip_channel(4);
        let settings = ServerSettings {
            state_event_cap: 10,
            default_event_count: 5,
            ..ServerSettings::default()
        };
        let state = AppState::with_settings(Arc::new(StateStore::default()), tips, &settings);
        assert_eq!(state.state_event_cap, 10);
        assert_eq!(state.default_event_count, 5);
    }

    #[test]
    fn defaults_match_settings_defaults() {
        let settings = ServerSettings::default();
        assert_eq!(
            i64::try_from(settings.state_event_cap).unwrap_or_default(),
            DEFAULT_STATE_EVENT_CAP
        );
        assert_eq!(settings.default_event_count, DEFAULT_EVENT_COUNT);
    }
}
