//! `POST /tip`: hand a short message to the producer.
//!
//! The body is read as raw bytes and parsed as one JSON object. The
//! message is taken from `message`, or from `tip` when `message` is
//! absent. A missing, non-string, or blank value is a 400 and nothing is
//! queued. On success the tip is queued without waiting and the response
//! echoes the message exactly as received, whatever happens to it later.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::Value;
use tracing::{debug, info, warn};
use vantage_core::TipDelivery;

use crate::error::ObserverError;
use crate::state::AppState;

/// Error text for a body without a usable message.
pub const MISSING_FIELD: &str = "Missing 'message' or 'tip' field";

/// Response body for an accepted tip.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct TipResponse {
    /// Always `"ok"`.
    pub status: String,
    /// The accepted message, verbatim.
    pub echo: String,
}

/// Pull the tip text out of a raw request body.
///
/// `message` wins whenever the key is present, even if its value turns out
/// to be unusable. Returns `None` for invalid JSON, a non-object, a
/// non-string value, or a blank string.
pub fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let object = value.as_object()?;
    let field = object.get("message").or_else(|| object.get("tip"))?;
    let message = field.as_str()?;
    if message.trim().is_empty() {
        None
    } else {
        Some(message.to_owned())
    }
}

/// Accept a tip and queue it for the producer.
pub async fn submit_tip(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TipResponse>, ObserverError> {
    let Some(message) = extract_message(&body) else {
        debug!(bytes = body.len(), "Rejected tip without a usable message");
        return Err(ObserverError::BadRequest(String::from(MISSING_FIELD)));
    };

    match state.tips.submit(message.clone()) {
        TipDelivery::Queued => info!(chars = message.chars().count(), "Tip queued"),
        TipDelivery::QueueFull => warn!("Tip queue full, tip dropped"),
        TipDelivery::Closed => warn!("Producer not running, tip dropped"),
    }

    Ok(Json(TipResponse {
        status: String::from("ok"),
        echo: message,
    }))
}

/// Any method other than `POST` on `/tip`.
pub async fn wrong_method() -> ObserverError {
    ObserverError::MethodNotAllowed { allow: "POST" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_key() {
        assert_eq!(
            extract_message(br#"{"message":"Drink a potion"}"#).as_deref(),
            Some("Drink a potion")
        );
    }

    #[test]
    fn tip_key_when_message_absent() {
        assert_eq!(
            extract_message(br#"{"tip":"Build a shelter"}"#).as_deref(),
            Some("Build a shelter")
        );
    }

    #[test]
    fn message_key_takes_precedence() {
        assert_eq!(
            extract_message(br#"{"tip":"b","message":"a"}"#).as_deref(),
            Some("a")
        );
        // A present but unusable `message` does not fall through to `tip`.
        assert_eq!(extract_message(br#"{"message":"  ","tip":"b"}"#), None);
    }

    #[test]
    fn unusable_bodies() {
        let bodies: [&[u8]; 8] = [
            b"",
            b"{}",
            b"not json",
            b"[\"message\"]",
            br#"{"message":42}"#,
            br#"{"message":null}"#,
            br#"{"tip":"   "}"#,
            br#"{"other":"x"}"#,
        ];
        for body in bodies {
            assert_eq!(extract_message(body), None, "body: {body:?}");
        }
    }

    #[test]
    fn echo_is_not_trimmed() {
        assert_eq!(
            extract_message(br#"{"message":"  eat  "}"#).as_deref(),
            Some("  eat  ")
        );
    }
}
