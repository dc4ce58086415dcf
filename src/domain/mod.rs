//! Domain layer: records, event envelopes and the live broadcast hub.
//!
//! This module contains the server-side domain model: the three monitored
//! record types with their identifiers, the `{type, data}` envelope pushed
//! to listeners, the hub owning the listener registry, and the relay that
//! feeds listener text back into the hub.

pub mod envelope;
pub mod hub;
pub mod inbound;
pub mod record_id;
pub mod records;
pub mod timestamp;

pub use envelope::{Envelope, EventType};
pub use hub::{BroadcastReport, ConnectionId, DeliveryError, Hub, HubSettings, Registration};
pub use inbound::{InboundRelay, InboundSender};
pub use record_id::RecordId;
pub use records::{
    Alert, Collection, ElementPatch, Metric, NetworkElement, NewAlert, NewElement, NewMetric, Record,
};
