//! Live connection registry port for real-time pushes.
//!
//! Replaces the process-wide socket map of classic implementations with a
//! narrow service interface keyed by user, swappable for a distributed
//! pub/sub backend later. The registry is advisory only: absence from it
//! degrades to "notification stored but not pushed", never to data loss.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Event pushed to live WebSocket sessions.
///
/// Intentionally content-free: clients react by refetching their
/// notification list, so a lost push costs one poll cycle at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PushEvent {
    NewNotification,
}

/// Sender half of a live connection's event channel.
pub type PushSender = tokio::sync::mpsc::UnboundedSender<PushEvent>;

/// Handle identifying one registered connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh connection handle.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Registry of live connections. A user may hold several (multiple tabs).
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionRegistry: Send + Sync {
    /// Register a connection for a user; returns the handle to unregister.
    fn register(&self, user: UserId, sender: PushSender) -> ConnectionId;

    /// Drop a connection (client disconnect or send failure).
    fn unregister(&self, connection: ConnectionId);

    /// Best-effort push to every live connection of `user`.
    ///
    /// Returns `false` when the user has no live connection; callers only
    /// log this, durability comes from the persisted notification row.
    fn push(&self, user: UserId, event: PushEvent) -> bool;
}
