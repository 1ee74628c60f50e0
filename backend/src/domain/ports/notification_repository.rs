//! Durable notification storage port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::notification::{NewNotification, Notification};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist one row per recipient.
    async fn insert_all(
        &self,
        notifications: &[NewNotification],
    ) -> Result<(), NotificationRepositoryError>;

    /// Most recent notifications for a user, newest first.
    async fn recent_for(
        &self,
        user: UserId,
        limit: i64,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Mark every unread notification for the user as read.
    async fn mark_all_read(&self, user: UserId) -> Result<(), NotificationRepositoryError>;

    /// Mark a single notification as read; a foreign id is a silent no-op
    /// (the row filter includes the owner).
    async fn mark_read(
        &self,
        id: Uuid,
        user: UserId,
    ) -> Result<(), NotificationRepositoryError>;
}
