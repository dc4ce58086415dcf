//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{Hub, InboundSender};
use crate::service::RecordService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Record service for all CRUD operations.
    pub records: Arc<RecordService>,
    /// Listener registry used by the WebSocket endpoint.
    pub hub: Hub,
    /// Queue feeding listener text to the inbound relay.
    pub inbound: InboundSender,
}
