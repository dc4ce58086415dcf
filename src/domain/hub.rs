//! Live broadcast hub: registry of open listener connections.
//!
//! [`Hub`] owns one bounded outbound queue per connection. A connection's
//! writer task drains its queue into the WebSocket; the hub only ever sees
//! the sending half. [`Hub::broadcast`] pushes an [`Envelope`] into every
//! queue concurrently, each send bounded by a timeout, and drops the
//! connections whose send failed before returning. A dropped connection is
//! told through its [`Registration::evicted`] signal so it can close the
//! socket.
//!
//! # Ordering
//!
//! A broadcast reaches the connections registered when it snapshots the
//! registry. A connection registering while a broadcast is in flight may or
//! may not receive that envelope. Per connection, envelopes arrive in the
//! order they were enqueued; concurrent broadcasts may enqueue in either
//! order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tokio::sync::oneshot;

use super::Envelope;

/// Frame type carried by the per-connection queues.
pub type Outbound = Arc<Envelope>;

/// Opaque handle of a registered listener connection. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Why a single delivery failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The connection's writer is gone (socket closed or write error).
    #[error("listener channel closed")]
    Closed,
    /// The outbound queue stayed full for the whole send timeout.
    #[error("listener stalled for {0:?}")]
    TimedOut(Duration),
}

/// Tuning knobs for a [`Hub`].
#[derive(Debug, Clone, Copy)]
pub struct HubSettings {
    /// Upper bound for one per-connection send during a broadcast.
    pub send_timeout: Duration,
    /// Capacity of each connection's outbound queue.
    pub queue_capacity: usize,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(2),
            queue_capacity: 64,
        }
    }
}

/// Handed to a connection when it joins the registry.
#[derive(Debug)]
pub struct Registration {
    /// Handle to pass back to [`Hub::unregister`].
    pub id: ConnectionId,
    /// Envelopes broadcast to this connection, in order.
    pub outbound: mpsc::Receiver<Outbound>,
    /// Resolves with `Ok(())` when the hub removes the connection on its own
    /// (failed delivery or [`Hub::close_all`]).
    pub evicted: oneshot::Receiver<()>,
}

/// Outcome of one [`Hub::broadcast`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Number of connections the envelope was queued for.
    pub delivered: usize,
    /// Connections whose delivery failed; they are no longer registered.
    pub dropped: Vec<ConnectionId>,
}

#[derive(Debug)]
struct Listener {
    tx: mpsc::Sender<Outbound>,
    evict: oneshot::Sender<()>,
}

impl Listener {
    fn evict(self) {
        // The connection may already be gone.
        let _ = self.evict.send(());
    }
}

#[derive(Debug)]
struct HubInner {
    connections: RwLock<HashMap<ConnectionId, Listener>>,
    next_id: AtomicU64,
    settings: HubSettings,
}

/// Registry of open listener connections and the broadcast operation.
///
/// Cheap to clone; all clones share the same registry.
#[derive(Debug, Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

impl Hub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new(settings: HubSettings) -> Self {
        let settings = HubSettings {
            send_timeout: settings.send_timeout.max(Duration::from_millis(1)),
            queue_capacity: settings.queue_capacity.max(1),
        };
        Self {
            inner: Arc::new(HubInner {
                connections: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                settings,
            }),
        }
    }

    /// Returns the effective settings.
    #[must_use]
    pub fn settings(&self) -> HubSettings {
        self.inner.settings
    }

    /// Adds a connection whose handshake has completed.
    pub async fn register(&self) -> Registration {
        let id = ConnectionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, outbound) = mpsc::channel(self.inner.settings.queue_capacity);
        let (evict, evicted) = oneshot::channel();

        let mut map = self.inner.connections.write().await;
        map.insert(id, Listener { tx, evict });
        tracing::info!(connection_id = %id, listeners = map.len(), "listener registered");

        Registration {
            id,
            outbound,
            evicted,
        }
    }

    /// Removes a connection. Returns `false` if it was not registered.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut map = self.inner.connections.write().await;
        let removed = map.remove(&id).is_some();
        if removed {
            tracing::info!(connection_id = %id, listeners = map.len(), "listener unregistered");
        }
        removed
    }

    /// Delivers `envelope` to every registered connection.
    ///
    /// Per-connection failures are logged and the failing connections are
    /// unregistered; they never abort delivery to the others.
    pub async fn broadcast(&self, envelope: Envelope) -> BroadcastReport {
        let envelope: Outbound = Arc::new(envelope);
        let targets: Vec<(ConnectionId, mpsc::Sender<Outbound>)> = {
            let map = self.inner.connections.read().await;
            map.iter()
                .map(|(id, listener)| (*id, listener.tx.clone()))
                .collect()
        };

        let send_timeout = self.inner.settings.send_timeout;
        let outcomes = join_all(targets.into_iter().map(|(id, tx)| {
            let envelope = Arc::clone(&envelope);
            async move { (id, deliver(&tx, envelope, send_timeout).await) }
        }))
        .await;

        let mut report = BroadcastReport::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    tracing::warn!(connection_id = %id, error = %err, "delivery failed, dropping listener");
                    report.dropped.push(id);
                }
            }
        }

        if !report.dropped.is_empty() {
            let mut map = self.inner.connections.write().await;
            for id in &report.dropped {
                if let Some(listener) = map.remove(id) {
                    listener.evict();
                }
            }
        }

        tracing::debug!(
            event_type = envelope.event_type.as_str(),
            delivered = report.delivered,
            dropped = report.dropped.len(),
            "broadcast complete"
        );
        report
    }

    /// Closes every connection. Their writers see the queue end and send a
    /// close frame; every connection's eviction signal fires.
    pub async fn close_all(&self) -> usize {
        let mut map = self.inner.connections.write().await;
        let closed = map.len();
        for (_, listener) in map.drain() {
            listener.evict();
        }
        tracing::info!(closed, "all listeners closed");
        closed
    }

    /// Returns `true` if `id` is currently registered.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.inner.connections.read().await.contains_key(&id)
    }

    /// Returns the number of registered connections.
    pub async fn len(&self) -> usize {
        self.inner.connections.read().await.len()
    }

    /// Returns `true` if no connection is registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.connections.read().await.is_empty()
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(HubSettings::default())
    }
}

async fn deliver(
    tx: &mpsc::Sender<Outbound>,
    envelope: Outbound,
    send_timeout: Duration,
) -> Result<(), DeliveryError> {
    tx.send_timeout(envelope, send_timeout)
        .await
        .map_err(|err| match err {
            SendTimeoutError::Timeout(_) => DeliveryError::TimedOut(send_timeout),
            SendTimeoutError::Closed(_) => DeliveryError::Closed,
        })
}
