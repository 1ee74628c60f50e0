//! Append-only grievance history.
//!
//! Every status change and comment becomes an immutable [`GrievanceUpdate`]
//! ordered by creation time ascending. Entries are never edited or deleted;
//! the author's role is snapshotted at write time so history keeps showing
//! the role the author actually held.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::grievance::GrievanceId;
use super::user::{Role, UserId};

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Comment,
    StatusChange,
}

impl UpdateKind {
    /// Stable label stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::StatusChange => "status_change",
        }
    }
}

/// Error returned when parsing an unknown entry kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ledger entry kind: {0}")]
pub struct UnknownUpdateKind(pub String);

impl std::str::FromStr for UpdateKind {
    type Err = UnknownUpdateKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comment" => Ok(Self::Comment),
            "status_change" => Ok(Self::StatusChange),
            other => Err(UnknownUpdateKind(other.to_owned())),
        }
    }
}

/// Immutable ledger entry: a comment or a recorded status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrievanceUpdate {
    pub id: Uuid,
    pub grievance_id: GrievanceId,
    pub author_id: UserId,
    /// Role the author held when the entry was written.
    pub author_role: Role,
    pub kind: UpdateKind,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Entry to be appended, before the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntryDraft {
    pub author_id: UserId,
    pub author_role: Role,
    pub kind: UpdateKind,
    pub body: String,
}

impl LedgerEntryDraft {
    /// Draft a comment entry.
    pub fn comment(author_id: UserId, author_role: Role, body: impl Into<String>) -> Self {
        Self {
            author_id,
            author_role,
            kind: UpdateKind::Comment,
            body: body.into(),
        }
    }

    /// Draft a status-change entry.
    pub fn status_change(author_id: UserId, author_role: Role, body: impl Into<String>) -> Self {
        Self {
            author_id,
            author_role,
            kind: UpdateKind::StatusChange,
            body: body.into(),
        }
    }
}
