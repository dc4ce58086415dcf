//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to a listener WebSocket.
///
/// Requests that are not valid upgrades are rejected by the extractor and
/// never reach the hub. Handshakes that fail after the response are logged
/// and likewise never registered.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let hub = state.hub.clone();
    let inbound = state.inbound.clone();

    ws.on_failed_upgrade(|err| tracing::warn!(error = %err, "websocket handshake failed"))
        .on_upgrade(move |socket| run_connection(socket, hub, inbound))
}
