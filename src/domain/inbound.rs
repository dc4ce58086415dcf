//! Inbound relay: listener text back out to every listener.
//!
//! Connection readers never touch the hub registry on the receive path.
//! They push raw text into a bounded queue through an [`InboundSender`];
//! a single [`InboundRelay`] task turns each text into a `message`
//! envelope and broadcasts it to all listeners, the sender included.

use tokio::sync::mpsc;

use super::hub::ConnectionId;
use super::{Envelope, Hub};

/// Text received from one listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
    /// Connection the frame arrived on.
    pub from: ConnectionId,
    /// Frame contents, untouched.
    pub text: String,
}

/// Returned when the relay task is no longer running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("inbound relay stopped")]
pub struct RelayClosed;

/// Cloneable handle used by connection readers.
#[derive(Debug, Clone)]
pub struct InboundSender {
    tx: mpsc::Sender<InboundText>,
}

impl InboundSender {
    /// Queues `text` for relay, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`RelayClosed`] if the relay task has exited.
    pub async fn forward(&self, from: ConnectionId, text: String) -> Result<(), RelayClosed> {
        self.tx
            .send(InboundText { from, text })
            .await
            .map_err(|_| RelayClosed)
    }
}

/// Single consumer of the inbound queue.
#[derive(Debug)]
pub struct InboundRelay {
    rx: mpsc::Receiver<InboundText>,
}

impl InboundRelay {
    /// Creates the queue with the given capacity (at least 1).
    #[must_use]
    pub fn channel(capacity: usize) -> (InboundSender, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (InboundSender { tx }, Self { rx })
    }

    /// Broadcasts every queued text until all senders are dropped.
    pub async fn run(mut self, hub: Hub) {
        while let Some(InboundText { from, text }) = self.rx.recv().await {
            tracing::debug!(connection_id = %from, bytes = text.len(), "relaying listener message");
            hub.broadcast(Envelope::message(text)).await;
        }
        tracing::debug!("inbound relay stopped");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ping_reaches_every_listener_including_sender() {
        let hub = Hub::default();
        let (inbound, relay) = InboundRelay::channel(8);
        let relay_task = tokio::spawn(relay.run(hub.clone()));

        let mut a = hub.register().await;
        let mut b = hub.register().await;
        let mut c = hub.register().await;

        let sent = inbound.forward(a.id, "ping".to_string()).await;
        assert!(sent.is_ok());

        for reg in [&mut a, &mut b, &mut c] {
            let Some(env) = reg.outbound.recv().await else {
                panic!("no envelope for {}", reg.id);
            };
            assert_eq!(*env, Envelope::message("ping"));
        }

        drop(inbound);
        let joined = relay_task.await;
        assert!(joined.is_ok());
    }

    #[tokio::test]
    async fn forward_fails_once_relay_is_gone() {
        let hub = Hub::default();
        let (inbound, relay) = InboundRelay::channel(1);
        drop(relay);
        let reg = hub.register().await;
        assert_eq!(
            inbound.forward(reg.id, "late".to_string()).await,
            Err(RelayClosed)
        );
    }
}
