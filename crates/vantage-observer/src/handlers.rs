//! Read endpoint handlers for the state API.
//!
//! All handlers read from the shared [`StateStore`] through one
//! `snapshot_limited` or `recent_events` call each, so the store lock is
//! never held while a response is serialized or written.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | JSON index of routes |
//! | `GET` | `/state` | Full snapshot, events capped |
//! | `GET` | `/inventory` | Inventory summary, counts, and slots |
//! | `GET` | `/events` | `n` newest events (default 20) |
//!
//! [`StateStore`]: vantage_core::StateStore

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{OriginalUri, Query, State};
use vantage_core::codec;
use vantage_types::{GameEvent, InventoryView, Snapshot};

use crate::error::ObserverError;
use crate::state::AppState;

/// Routes advertised by the index, in the order they are registered.
pub const ROUTES: [&str; 5] = ["/", "/state", "/inventory", "/events", "/tip"];

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Decoded `key=value` pairs of a query string, in request order.
///
/// Deserializing into pairs instead of a struct keeps repeated keys, so
/// `?n=1&n=2` is read rather than rejected.
pub type QueryPairs = Vec<(String, String)>;

/// The count requested by the last `n` pair, or `default` when there is no
/// `n` or the last one is not an integer.
pub fn requested_count(pairs: &[(String, String)], default: i64) -> i64 {
    pairs
        .iter()
        .rev()
        .find(|(key, _)| key == "n")
        .and_then(|(_, raw)| raw.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

// ---------------------------------------------------------------------------
// GET / -- route index
// ---------------------------------------------------------------------------

/// Serve a small JSON index with the route list and buffered event count.
pub async fn index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "vantage",
        "routes": ROUTES,
        "events": state.store.event_count(),
    }))
}

// ---------------------------------------------------------------------------
// GET /state
// ---------------------------------------------------------------------------

/// Return the current snapshot with at most `state_event_cap` events.
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.store.snapshot_limited(state.state_event_cap))
}

// ---------------------------------------------------------------------------
// GET /inventory
// ---------------------------------------------------------------------------

/// Return the inventory summary, per-item counts, and slot list.
pub async fn get_inventory(State(state): State<Arc<AppState>>) -> Json<InventoryView> {
    Json(codec::inventory_view(state.store.snapshot_limited(0)))
}

// ---------------------------------------------------------------------------
// GET /events
// ---------------------------------------------------------------------------

/// Return the `n` newest events, newest first.
///
/// A missing or unparsable `n` falls back to the configured default. A
/// non-positive `n` yields an empty list. When `n` repeats, the last one
/// counts; a query string that cannot be decoded is treated as empty.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Json<Vec<GameEvent>> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let n = requested_count(&pairs, state.default_event_count);
    Json(state.store.recent_events(n))
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// Answer unknown paths with a JSON 404.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ObserverError {
    ObserverError::NotFound(uri.path().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> QueryPairs {
        raw.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn count_parsing() {
        assert_eq!(requested_count(&pairs(&[]), 20), 20);
        assert_eq!(requested_count(&pairs(&[("n", "5")]), 20), 5);
        assert_eq!(requested_count(&pairs(&[("n", " 7 ")]), 20), 7);
        assert_eq!(requested_count(&pairs(&[("n", "-3")]), 20), -3);
        assert_eq!(requested_count(&pairs(&[("n", "abc")]), 20), 20);
        assert_eq!(requested_count(&pairs(&[("n", "")]), 20), 20);
        assert_eq!(requested_count(&pairs(&[("n", "2.5")]), 20), 20);
        assert_eq!(requested_count(&pairs(&[("limit", "5")]), 20), 20);
    }

    #[test]
    fn last_repeated_n_wins() {
        assert_eq!(requested_count(&pairs(&[("n", "1"), ("n", "2")]), 20), 2);
        assert_eq!(requested_count(&pairs(&[("x", "y"), ("n", "4"), ("z", "1")]), 20), 4);
        assert_eq!(requested_count(&pairs(&[("n", "3"), ("n", "oops")]), 20), 20);
    }
}
