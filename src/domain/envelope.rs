//! Event envelopes pushed to real-time listeners.
//!
//! Every broadcast carries an [`Envelope`] serialized as
//! `{"type": "<event type>", "data": <payload>}`. Envelopes are transient:
//! they are never persisted and are immutable once built.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Discriminator of an [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A network element was created.
    ElementCreated,
    /// A new metric sample was recorded.
    MetricUpdate,
    /// An alert was raised.
    AlertCreated,
    /// Free text relayed from a listener.
    Message,
}

impl EventType {
    /// Returns the wire name of the event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ElementCreated => "element_created",
            Self::MetricUpdate => "metric_update",
            Self::AlertCreated => "alert_created",
            Self::Message => "message",
        }
    }
}

/// `{type, data}` wrapper delivered to every listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Envelope {
    /// Event discriminator.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Arbitrary payload, usually a serialized record.
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Builds an envelope around an already-serialized payload.
    #[must_use]
    pub fn new(event_type: EventType, data: serde_json::Value) -> Self {
        Self { event_type, data }
    }

    /// Builds an envelope from any serializable record.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `record` cannot be represented
    /// as JSON.
    pub fn from_record<T: Serialize>(
        event_type: EventType,
        record: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event_type, serde_json::to_value(record)?))
    }

    /// Wraps inbound listener text, verbatim, as a `message` envelope.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::new(EventType::Message, serde_json::Value::String(text.into()))
    }
}
