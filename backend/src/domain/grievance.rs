//! Grievances, tickets, statuses, and attachments.

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::department::DepartmentId;
use super::user::UserId;

/// Internal grievance identifier (primary key).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct GrievanceId(Uuid);

impl GrievanceId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for GrievanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable external ticket identifier.
///
/// Format: `GRM` + two-digit year, month, day + four random digits, e.g.
/// `GRM2608304217`. Not collision proof on its own; the store enforces a
/// unique index and callers retry generation on conflict.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TicketId(String);

/// Validation failure for externally supplied ticket identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed ticket identifier: {0}")]
pub struct InvalidTicketId(pub String);

impl TicketId {
    const PREFIX: &'static str = "GRM";

    /// Generate a ticket identifier for the given instant.
    pub fn generate<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let date = now.date_naive();
        let suffix: u32 = rng.gen_range(1000..10000);
        Self(format!(
            "{}{:02}{:02}{:02}{suffix}",
            Self::PREFIX,
            date.year() % 100,
            date.month(),
            date.day(),
        ))
    }

    /// Validate and wrap an externally supplied identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidTicketId> {
        let raw = raw.into();
        let digits = raw.strip_prefix(Self::PREFIX).unwrap_or("");
        if digits.len() == 10 && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw))
        } else {
            Err(InvalidTicketId(raw))
        }
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TicketId {
    type Err = InvalidTicketId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Grievance lifecycle status.
///
/// `Resolved` and `Rejected` end the normal flow but are not locked: an
/// authorised actor may still comment or move the grievance again.
/// `AwaitingClarification` returns to `Submitted` automatically when the
/// submitter replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum GrievanceStatus {
    Submitted,
    InProgress,
    Resolved,
    Rejected,
    Escalated,
    AwaitingClarification,
}

impl GrievanceStatus {
    /// Human-readable label, also the stored database value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
            Self::Escalated => "Escalated",
            Self::AwaitingClarification => "Awaiting Clarification",
        }
    }
}

impl std::fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grievance status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for GrievanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Submitted" => Ok(Self::Submitted),
            "In Progress" => Ok(Self::InProgress),
            "Resolved" => Ok(Self::Resolved),
            "Rejected" => Ok(Self::Rejected),
            "Escalated" => Ok(Self::Escalated),
            "Awaiting Clarification" => Ok(Self::AwaitingClarification),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// The central grievance entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Grievance {
    pub id: GrievanceId,
    pub ticket_id: TicketId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: GrievanceStatus,
    pub submitted_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A grievance together with its single active department assignment.
///
/// The assignment lives in a separate relation so re-routing never mutates
/// the grievance record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignedGrievance {
    pub grievance: Grievance,
    pub department: DepartmentId,
}

/// Attachment metadata linked to a grievance; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Uuid,
    pub grievance_id: GrievanceId,
    pub file_name: String,
    pub stored_path: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

/// Per-status counts backing the officer dashboard analytics.
///
/// `total_pending` counts `Submitted` plus `Awaiting Clarification`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub newly_submitted: i64,
    pub awaiting_clarification: i64,
    pub total_pending: i64,
    pub resolved: i64,
    pub rejected: i64,
    pub escalated: i64,
}

impl StatusCounts {
    /// Fold `(status, count)` pairs into the dashboard shape.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (GrievanceStatus, i64)>) -> Self {
        let mut counts = Self::default();
        for (status, n) in pairs {
            match status {
                GrievanceStatus::Submitted => counts.newly_submitted += n,
                GrievanceStatus::AwaitingClarification => counts.awaiting_clarification += n,
                GrievanceStatus::Resolved => counts.resolved += n,
                GrievanceStatus::Rejected => counts.rejected += n,
                GrievanceStatus::Escalated => counts.escalated += n,
                GrievanceStatus::InProgress => {}
            }
        }
        counts.total_pending = counts.newly_submitted + counts.awaiting_clarification;
        counts
    }
}
