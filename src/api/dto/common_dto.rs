//! Response wrappers shared by every record endpoint.
//!
//! All bodies carry `"success": true`; failures use
//! [`crate::error::ErrorResponse`] instead.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::RecordId;

/// Body of a successful create: the new identifier and the stored record.
#[derive(Debug, Serialize)]
pub struct CreatedResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Store-assigned identifier.
    pub id: RecordId,
    /// The stored record, including `_id` and server timestamps.
    pub data: T,
}

impl<T> CreatedResponse<T> {
    /// Wraps a freshly created record.
    #[must_use]
    pub fn new(id: RecordId, data: T) -> Self {
        Self {
            success: true,
            id,
            data,
        }
    }
}

/// Body of a list endpoint.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Number of entries in `data`.
    pub count: usize,
    /// The matching records.
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Body of a single-record fetch.
#[derive(Debug, Serialize)]
pub struct ItemResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// The record.
    pub data: T,
}

impl<T> ItemResponse<T> {
    /// Wraps a fetched record.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of an update, delete or resolve.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Always `true`.
    pub success: bool,
    /// What happened, e.g. `"Element updated"`.
    pub message: String,
}

impl MessageResponse {
    /// Builds a success message.
    #[must_use]
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}
