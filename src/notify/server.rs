use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::notify::protocol::ServerEvent;

/// Identifies one WebSocket connection within the registry. A user with
/// several open tabs holds several connections, so removal must target one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionId(u64);

/// A handle to push events to one connected WebSocket client.
#[derive(Debug)]
struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

/// Registry of live WebSocket connections, keyed by user identity.
///
/// A connection registers interest in events for exactly one user (its own).
/// The hiring coordinator only reads from the registry: it looks up the
/// winner's channels and pushes the event, best-effort.
pub struct NotificationServer {
    /// user_id -> connections registered for that user
    connections: RwLock<HashMap<Uuid, Vec<ConnectionHandle>>>,
    next_id: AtomicU64,
}

impl NotificationServer {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new connection for a user. Returns the connection id (for
    /// `unregister`) and the receiver the WebSocket session listens on.
    pub async fn register(
        &self,
        user_id: Uuid,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut connections = self.connections.write().await;
        connections
            .entry(user_id)
            .or_default()
            .push(ConnectionHandle { id, sender: tx });

        (id, rx)
    }

    /// Remove one connection for a user.
    pub async fn unregister(&self, user_id: Uuid, connection_id: ConnectionId) {
        let mut connections = self.connections.write().await;

        if let Some(handles) = connections.get_mut(&user_id) {
            handles.retain(|h| h.id != connection_id);

            // Clean up users with no connections left.
            if handles.is_empty() {
                connections.remove(&user_id);
            }
        }
    }

    /// Push an event to every live connection registered for a user.
    /// Returns how many channels accepted the event.
    pub async fn emit_to_user(&self, user_id: Uuid, event: ServerEvent) -> usize {
        let connections = self.connections.read().await;
        let mut delivered = 0;

        if let Some(handles) = connections.get(&user_id) {
            for handle in handles {
                // A failed send means the receiver was dropped (disconnect);
                // the session's unregister will clean it up.
                if handle.sender.send(event.clone()).is_ok() {
                    delivered += 1;
                }
            }
        }

        delivered
    }

    /// Check whether a user currently has any live connection.
    pub async fn is_user_online(&self, user_id: Uuid) -> bool {
        let connections = self.connections.read().await;
        connections
            .get(&user_id)
            .map(|handles| !handles.is_empty())
            .unwrap_or(false)
    }
}

impl Default for NotificationServer {
    fn default() -> Self {
        Self::new()
    }
}
