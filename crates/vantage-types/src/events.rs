//! Discrete event records kept in the store's recent-event buffer.
//!
//! The producer classifies what happened during a tick and hands the store
//! an [`EventDraft`]. The store turns the draft into a [`GameEvent`] by
//! stamping the insertion time, so the producer never picks timestamps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::EventType;

/// One value in an event's `details` map.
///
/// Restricted to JSON scalars so the payload serializes the same way
/// regardless of event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum DetailValue {
    /// JSON `null` (e.g. no block under the crosshair).
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A whole number.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string, typically a namespaced identifier.
    Text(String),
}

impl From<bool> for DetailValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DetailValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for DetailValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for DetailValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f32> for DetailValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for DetailValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T: Into<Self>> From<Option<T>> for DetailValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Named detail fields attached to an event.
pub type Details = BTreeMap<String, DetailValue>;

/// An event as classified by the producer, before the store stamps it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// What kind of occurrence this is.
    pub event_type: EventType,
    /// Type-specific detail fields.
    pub details: Details,
}

impl EventDraft {
    /// Start a draft with no detail fields.
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            details: BTreeMap::new(),
        }
    }

    /// Add (or replace) one detail field.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<DetailValue>) -> Self {
        self.details.insert(key.to_owned(), value.into());
        self
    }
}

/// One discrete occurrence, as stored in and served from the event buffer.
///
/// Serialized as `{"type", "timestamp", "details"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameEvent {
    /// The event kind.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Milliseconds since the Unix epoch, assigned on insertion.
    pub timestamp: i64,
    /// Type-specific detail fields.
    pub details: Details,
}

impl GameEvent {
    /// Build the stored record for `draft` with the insertion timestamp.
    ///
    /// Called by the store's insertion path; producers hand over drafts.
    pub fn from_draft(draft: EventDraft, timestamp: i64) -> Self {
        Self {
            event_type: draft.event_type,
            timestamp,
            details: draft.details,
        }
    }

    /// Look up one detail field.
    pub fn detail(&self, key: &str) -> Option<&DetailValue> {
        self.details.get(key)
    }
}
