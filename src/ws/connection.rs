//! WebSocket connection lifecycle.
//!
//! After the upgrade, a connection is registered with the hub and split in
//! two: a writer task drains the hub's outbound queue into the socket, and
//! the reader loop forwards text frames to the inbound relay. Whichever
//! side stops first ends the connection, which is then unregistered. When
//! the hub drops the connection itself, the reader stops at once and the
//! writer gets one send timeout to flush its close frame before it is
//! aborted, so a stalled socket is torn down rather than left open.

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::hub::Outbound;
use crate::domain::{ConnectionId, Hub, InboundSender, Registration};

/// Lifecycle of one listener connection.
///
/// `Open → Closed` happens on a client close, an I/O error or eviction by
/// the hub. A failed handshake goes straight to `Closed` and never reaches
/// the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// HTTP upgrade requested, handshake not finished.
    PendingHandshake,
    /// Registered with the hub.
    Open,
    /// Terminal.
    Closed,
}

impl ConnectionState {
    /// Moves to `next` if the transition is legal. `Closed` is terminal.
    #[must_use]
    pub fn advance(self, next: Self) -> Option<Self> {
        match (self, next) {
            (Self::PendingHandshake, Self::Open)
            | (Self::PendingHandshake, Self::Closed)
            | (Self::Open, Self::Closed) => Some(next),
            _ => None,
        }
    }
}

/// Why the connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseCause {
    /// Client sent a close frame or the stream ended.
    ClientClosed,
    /// Reading from the socket failed.
    ReadError,
    /// Writer stopped after a write error or the end of its queue.
    WriterStopped,
    /// Inbound relay is gone.
    RelayStopped,
    /// Hub dropped the listener after a failed delivery, or shutdown.
    Evicted,
}

/// Runs a connection whose handshake has completed until it closes.
pub async fn run_connection(socket: WebSocket, hub: Hub, inbound: InboundSender) {
    let Registration {
        id,
        outbound,
        mut evicted,
    } = hub.register().await;
    tracing::debug!(connection_id = %id, "listener connected");

    let (ws_tx, ws_rx) = socket.split();
    let mut writer = tokio::spawn(write_loop(id, ws_tx, outbound));

    let cause = tokio::select! {
        cause = read_loop(id, ws_rx, &inbound) => cause,
        _ = &mut writer => CloseCause::WriterStopped,
        _ = &mut evicted => CloseCause::Evicted,
    };

    if cause == CloseCause::Evicted {
        let grace = hub.settings().send_timeout;
        if tokio::time::timeout(grace, &mut writer).await.is_err() {
            tracing::debug!(connection_id = %id, "writer stalled, aborting");
        }
    }
    writer.abort();

    hub.unregister(id).await;
    tracing::debug!(connection_id = %id, ?cause, "listener disconnected");
}

/// Forwards text frames to the relay until the client goes away.
async fn read_loop(
    id: ConnectionId,
    mut ws_rx: SplitStream<WebSocket>,
    inbound: &InboundSender,
) -> CloseCause {
    loop {
        match ws_rx.next().await {
            Some(Ok(Message::Text(text))) => {
                if inbound.forward(id, text.to_string()).await.is_err() {
                    return CloseCause::RelayStopped;
                }
            }
            Some(Ok(Message::Close(_))) | None => return CloseCause::ClientClosed,
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                tracing::debug!(connection_id = %id, error = %err, "websocket read failed");
                return CloseCause::ReadError;
            }
        }
    }
}

/// Writes queued envelopes to the socket. Sends a close frame once the hub
/// drops the queue.
async fn write_loop(
    id: ConnectionId,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Outbound>,
) {
    while let Some(envelope) = outbound.recv().await {
        let json = match serde_json::to_string(&*envelope) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(connection_id = %id, error = %err, "failed to serialize envelope");
                continue;
            }
        };
        if let Err(err) = ws_tx.send(Message::text(json)).await {
            tracing::debug!(connection_id = %id, error = %err, "websocket write failed");
            return;
        }
    }
    let _ = ws_tx.send(Message::Close(None)).await;
}
