//! Monitored record types: network elements, metrics and alerts.
//!
//! Records are plain data owned by the record store. The hub never mutates
//! them; it only forwards serialized copies inside an [`super::Envelope`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordId;
use super::timestamp;
use crate::error::GatewayError;

/// Document collection a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Monitored devices.
    NetworkElements,
    /// Measurements reported for an element.
    Metrics,
    /// Alerts raised against an element.
    Alerts,
}

impl Collection {
    /// Returns the collection name used as the storage key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkElements => "network_elements",
            Self::Metrics => "metrics",
            Self::Alerts => "alerts",
        }
    }
}

/// A record together with its store-assigned identifier.
///
/// Serializes as the record's own fields plus an `_id` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    /// Store-assigned identifier.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// Record fields.
    #[serde(flatten)]
    pub fields: T,
}

/// Default status of a newly registered element.
pub const DEFAULT_ELEMENT_STATUS: &str = "active";

/// A monitored network device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NetworkElement {
    /// Human-readable element name.
    pub name: String,
    /// Management address.
    pub ip_address: String,
    /// Element kind (router, switch, ...).
    #[serde(rename = "type")]
    pub element_type: String,
    /// Optional site or rack description.
    #[serde(default)]
    pub location: Option<String>,
    /// Operational status, `"active"` unless stated otherwise.
    pub status: String,
    /// Server-assigned registration time.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A single measurement for an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Metric {
    /// Identifier of the element the value belongs to.
    pub element_id: String,
    /// Measurement kind (cpu, latency, ...).
    pub metric_type: String,
    /// Measured value.
    pub value: f64,
    /// Unit of `value`.
    pub unit: String,
    /// Server-assigned receive time.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// An alert raised for an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Alert {
    /// Identifier of the affected element.
    pub element_id: String,
    /// Free-form severity label.
    pub severity: String,
    /// Alert text.
    pub message: String,
    /// Whether the alert has been resolved.
    pub resolved: bool,
    /// Server-assigned creation time.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Time of resolution, set by the resolve endpoint.
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Client-supplied fields for a new network element.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewElement {
    /// Human-readable element name.
    pub name: String,
    /// Management address.
    pub ip_address: String,
    /// Element kind.
    #[serde(rename = "type")]
    pub element_type: String,
    /// Optional site or rack description.
    #[serde(default)]
    pub location: Option<String>,
    /// Initial status; `"active"` when omitted.
    #[serde(default)]
    pub status: Option<String>,
}

impl NewElement {
    /// Checks required fields and stamps the creation time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if a required field is blank.
    pub fn into_element(self, now: DateTime<Utc>) -> Result<NetworkElement, GatewayError> {
        require("name", &self.name)?;
        require("ip_address", &self.ip_address)?;
        require("type", &self.element_type)?;
        Ok(NetworkElement {
            name: self.name,
            ip_address: self.ip_address,
            element_type: self.element_type,
            location: self.location,
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_ELEMENT_STATUS.to_string()),
            created_at: now,
        })
    }
}

/// Partial update of a network element. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ElementPatch {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New management address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// New element kind.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    /// New location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ElementPatch {
    /// Rejects blank values for fields that must not be blank.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] on the first blank field.
    pub fn validate(&self) -> Result<(), GatewayError> {
        for (field, value) in [
            ("name", &self.name),
            ("ip_address", &self.ip_address),
            ("type", &self.element_type),
        ] {
            if let Some(value) = value {
                require(field, value)?;
            }
        }
        Ok(())
    }
}

/// Client-supplied fields for a new metric sample.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewMetric {
    /// Element the value belongs to.
    pub element_id: String,
    /// Measurement kind.
    pub metric_type: String,
    /// Measured value.
    pub value: f64,
    /// Unit of `value`.
    pub unit: String,
}

impl NewMetric {
    /// Checks required fields and stamps the receive time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if a required field is blank.
    pub fn into_metric(self, now: DateTime<Utc>) -> Result<Metric, GatewayError> {
        require("element_id", &self.element_id)?;
        require("metric_type", &self.metric_type)?;
        require("unit", &self.unit)?;
        Ok(Metric {
            element_id: self.element_id,
            metric_type: self.metric_type,
            value: self.value,
            unit: self.unit,
            timestamp: now,
        })
    }
}

/// Client-supplied fields for a new alert.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAlert {
    /// Affected element.
    pub element_id: String,
    /// Severity label.
    pub severity: String,
    /// Alert text.
    pub message: String,
    /// Initial resolution flag, `false` when omitted.
    #[serde(default)]
    pub resolved: bool,
}

impl NewAlert {
    /// Checks required fields and stamps the creation time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if a required field is blank.
    pub fn into_alert(self, now: DateTime<Utc>) -> Result<Alert, GatewayError> {
        require("element_id", &self.element_id)?;
        require("severity", &self.severity)?;
        require("message", &self.message)?;
        Ok(Alert {
            element_id: self.element_id,
            severity: self.severity,
            message: self.message,
            resolved: self.resolved,
            created_at: now,
            resolved_at: None,
        })
    }
}

fn require(field: &str, value: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(format!(
            "{field} must not be blank"
        )));
    }
    Ok(())
}
