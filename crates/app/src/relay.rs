//! Product change broadcast relay.
//!
//! Every connected session holds a [`RelaySession`]. Anything published is
//! delivered to every session connected at that moment, the publisher
//! included. Delivery is best effort: publishing never waits on a
//! recipient, sessions that connect later get no backlog, and a session
//! that falls more than `capacity` events behind loses the oldest ones
//! without affecting anyone else.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

/// Event name clients publish.
pub const PRODUCT_UPDATE_EVENT: &str = "product-update";

/// Event name the relay delivers.
pub const PRODUCT_UPDATED_EVENT: &str = "product-updated";

/// Default number of events buffered per session.
pub const DEFAULT_RELAY_CAPACITY: usize = 256;

/// Identifier of a connected session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A change event travelling through the relay.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayEvent {
    /// Session that published the event, `None` for server-originated events.
    pub origin: Option<SessionId>,

    /// Opaque payload forwarded unchanged.
    pub payload: Value,
}

#[derive(Debug, Clone)]
pub struct BroadcastRelay {
    sender: broadcast::Sender<RelayEvent>,
    next_session: Arc<AtomicU64>,
}

impl Default for BroadcastRelay {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_CAPACITY)
    }
}

impl BroadcastRelay {
    /// Create a relay buffering up to `capacity` events per session.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));

        Self {
            sender,
            next_session: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a new session.
    #[must_use]
    pub fn connect(&self) -> RelaySession {
        let id = SessionId(self.next_session.fetch_add(1, Ordering::Relaxed));
        let receiver = self.sender.subscribe();

        info!(
            session_id = %id,
            sessions = self.session_count(),
            "push session connected"
        );

        RelaySession {
            id,
            receiver,
            relay: self.clone(),
        }
    }

    /// Fan `payload` out to every connected session.
    ///
    /// Returns the number of sessions the event was queued for.
    pub fn publish(&self, origin: Option<SessionId>, payload: Value) -> usize {
        // `send` only fails when no session is connected.
        self.sender
            .send(RelayEvent { origin, payload })
            .unwrap_or(0)
    }

    /// Number of currently connected sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// One connected session's view of the relay.
#[derive(Debug)]
pub struct RelaySession {
    id: SessionId,
    receiver: broadcast::Receiver<RelayEvent>,
    relay: BroadcastRelay,
}

impl RelaySession {
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Publish an event on behalf of this session.
    pub fn publish(&self, payload: Value) -> usize {
        self.relay.publish(Some(self.id), payload)
    }

    /// Wait for the next event addressed to this session.
    ///
    /// Events dropped because the session fell behind are skipped.
    /// Returns `None` once the relay is gone.
    pub async fn recv(&mut self) -> Option<RelayEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(session_id = %self.id, skipped, "push session lagged, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for RelaySession {
    fn drop(&mut self) {
        info!(
            session_id = %self.id,
            sessions = self.relay.session_count().saturating_sub(1),
            "push session disconnected"
        );
    }
}
