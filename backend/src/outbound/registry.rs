//! In-process live connection registry.
//!
//! Tracks the event channels of open WebSocket sessions keyed by user, so
//! the notification fan-out can nudge every tab a recipient has open. State
//! lives in a process-local map behind an `RwLock`; a distributed pub/sub
//! adapter could replace this without touching the domain.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::domain::ports::{ConnectionId, ConnectionRegistry, PushEvent, PushSender};
use crate::domain::UserId;

#[derive(Default)]
struct Connections {
    by_user: HashMap<UserId, Vec<(ConnectionId, PushSender)>>,
    owners: HashMap<ConnectionId, UserId>,
}

/// Process-local implementation of the `ConnectionRegistry` port.
#[derive(Default)]
pub struct InProcessConnectionRegistry {
    inner: RwLock<Connections>,
}

impl InProcessConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConnectionRegistry for InProcessConnectionRegistry {
    fn register(&self, user: UserId, sender: PushSender) -> ConnectionId {
        let connection = ConnectionId::random();
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.by_user.entry(user).or_default().push((connection, sender));
        inner.owners.insert(connection, user);
        debug!(%user, "websocket connection registered");
        connection
    }

    fn unregister(&self, connection: ConnectionId) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let Some(user) = inner.owners.remove(&connection) else {
            return;
        };
        if let Some(connections) = inner.by_user.get_mut(&user) {
            connections.retain(|(id, _)| *id != connection);
            if connections.is_empty() {
                inner.by_user.remove(&user);
            }
        }
        debug!(%user, "websocket connection unregistered");
    }

    fn push(&self, user: UserId, event: PushEvent) -> bool {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let Some(connections) = inner.by_user.get(&user) else {
            return false;
        };
        let mut delivered = false;
        for (_, sender) in connections {
            // A closed channel means the session is tearing down; it will
            // unregister itself, so no cleanup here.
            if sender.send(event).is_ok() {
                delivered = true;
            }
        }
        delivered
    }
}
