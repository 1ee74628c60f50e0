//! Grievance status transition rules.
//!
//! Pure validation: a requested transition either yields a [`TransitionPlan`]
//! describing the status flip plus the ledger entry to append, or a
//! validation error, with nothing mutated. Officers may move a grievance
//! between any two distinct statuses (terminal states are not locked); the
//! rules below only add the no-op guard and per-target reason requirements.

use serde::Deserialize;
use utoipa::ToSchema;

use super::error::Error;
use super::grievance::GrievanceStatus;
use super::ledger::UpdateKind;

/// A transition request as supplied by an authorised officer.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// Target status.
    pub status: GrievanceStatus,
    /// Rejection reason or clarification question, depending on the target.
    pub reason: Option<String>,
}

/// A validated transition: the status flip and the ledger entry recording it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: GrievanceStatus,
    pub to: GrievanceStatus,
    /// Clarification requests are recorded as comments because they function
    /// as questions to the submitter; everything else is a status change.
    pub entry_kind: UpdateKind,
    pub entry_body: String,
}

/// Body of the synthetic entry appended when a submitter reply reopens a
/// grievance that was awaiting clarification.
pub fn reopen_entry_body() -> String {
    format!("Status changed to {}", GrievanceStatus::Submitted)
}

/// Whether a comment by `author_is_owner` triggers the automatic reopen.
pub fn reopens_on_comment(current: GrievanceStatus, author_is_owner: bool) -> bool {
    author_is_owner && current == GrievanceStatus::AwaitingClarification
}

fn required_reason(request: &TransitionRequest, what: &str) -> Result<String, Error> {
    match request.reason.as_deref().map(str::trim) {
        Some(reason) if !reason.is_empty() => Ok(reason.to_owned()),
        _ => Err(Error::invalid_request(format!(
            "a non-empty reason is required when {what}"
        ))),
    }
}

/// Validate a transition request against the current status.
///
/// Fails without side effects on a no-op transition (same status twice, which
/// would only duplicate notifications) or a missing reason.
pub fn plan(current: GrievanceStatus, request: &TransitionRequest) -> Result<TransitionPlan, Error> {
    if request.status == current {
        return Err(Error::invalid_request(format!(
            "grievance is already in status {current}"
        )));
    }

    let (entry_kind, entry_body) = match request.status {
        GrievanceStatus::Rejected => {
            let reason = required_reason(request, "rejecting a grievance")?;
            (
                UpdateKind::StatusChange,
                format!("Status changed to Rejected. Reason: {reason}"),
            )
        }
        GrievanceStatus::AwaitingClarification => {
            let reason = required_reason(request, "requesting clarification")?;
            (UpdateKind::Comment, reason)
        }
        other => (
            UpdateKind::StatusChange,
            format!("Status changed to {other}"),
        ),
    };

    Ok(TransitionPlan {
        from: current,
        to: request.status,
        entry_kind,
        entry_body,
    })
}
