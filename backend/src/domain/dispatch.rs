//! Recipient computation for notification fan-out.
//!
//! Pure: given the event and the relevant audience lists, decide who gets
//! notified and with what message. Persistence and delivery live in the
//! dispatcher service ([`crate::domain::services::NotificationDispatcher`]).

use super::grievance::{GrievanceStatus, TicketId};
use super::user::UserId;

/// Ledger event that triggers a fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    /// The submitter commented (including the reply that reopens a ticket).
    SubmitterCommented,
    /// An officer or admin commented.
    OfficerCommented,
    /// An accepted status transition.
    StatusChanged { to: GrievanceStatus },
}

/// Candidate recipients resolved from the directory for one grievance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audience {
    pub submitter: UserId,
    /// Nodal officers and department heads of the assigned department.
    pub department_officers: Vec<UserId>,
    pub super_admins: Vec<UserId>,
}

/// Compute the recipient set for an event.
///
/// Escalation redirects the fan-out to administrators; the submitter is not
/// notified on that path. The acting user is never notified about their own
/// action, and duplicates are removed while preserving order.
pub fn recipients(event: NotificationEvent, actor: UserId, audience: &Audience) -> Vec<UserId> {
    let candidates: Vec<UserId> = match event {
        NotificationEvent::SubmitterCommented => audience.department_officers.clone(),
        NotificationEvent::OfficerCommented => vec![audience.submitter],
        NotificationEvent::StatusChanged {
            to: GrievanceStatus::Escalated,
        } => audience.super_admins.clone(),
        NotificationEvent::StatusChanged { .. } => vec![audience.submitter],
    };

    let mut seen = std::collections::BTreeSet::new();
    candidates
        .into_iter()
        .filter(|id| *id != actor && seen.insert(*id))
        .collect()
}

/// Human-readable message for the notification row.
pub fn message(event: NotificationEvent, ticket: &TicketId) -> String {
    match event {
        NotificationEvent::SubmitterCommented => {
            format!("New comment from the submitter on grievance #{ticket}.")
        }
        NotificationEvent::OfficerCommented => {
            format!("An officer commented on your grievance #{ticket}.")
        }
        NotificationEvent::StatusChanged {
            to: GrievanceStatus::Escalated,
        } => format!("Grievance #{ticket} was escalated."),
        NotificationEvent::StatusChanged { to } => {
            format!("Your grievance #{ticket} status changed to {to}.")
        }
    }
}

/// Deep link carried by every notification for this grievance.
pub fn link(ticket: &TicketId) -> String {
    format!("/grievance/{ticket}")
}
