//! Per-recipient notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Durable notification row; mutated only to flip `is_read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: UserId,
    pub message: String,
    /// Deep link into the portal, e.g. `/grievance/GRM2608301234`.
    pub link: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification to be persisted for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub message: String,
    pub link: String,
}
