//! Transactional store port for grievances and their ledger.
//!
//! Every multi-step write (transition + entry, comment + auto-reopen) is a
//! single method so adapters can wrap it in one database transaction; the
//! domain never sequences partial writes across calls.

use async_trait::async_trait;

use crate::domain::department::DepartmentId;
use crate::domain::grievance::{
    AssignedGrievance, Attachment, Grievance, GrievanceId, GrievanceStatus, StatusCounts, TicketId,
};
use crate::domain::ledger::{GrievanceUpdate, LedgerEntryDraft};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by grievance store adapters.
    pub enum GrievanceStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "grievance store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "grievance store query failed: {message}",
        /// The ticket identifier collided with an existing grievance.
        DuplicateTicket { ticket: String } => "ticket identifier already in use: {ticket}",
    }
}

/// New grievance with its routed department assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGrievance {
    pub ticket_id: TicketId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub submitted_by: UserId,
    pub assigned_department: DepartmentId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrievanceStore: Send + Sync {
    /// Insert a grievance and its active department assignment.
    ///
    /// Fails with [`GrievanceStoreError::DuplicateTicket`] when the ticket
    /// identifier is already taken; callers regenerate and retry.
    async fn create(&self, grievance: &NewGrievance) -> Result<Grievance, GrievanceStoreError>;

    /// Fetch a grievance with its active assignment by external ticket id.
    async fn find_by_ticket(
        &self,
        ticket: &TicketId,
    ) -> Result<Option<AssignedGrievance>, GrievanceStoreError>;

    /// Full ordered history (creation time ascending) for a grievance.
    async fn history(
        &self,
        grievance: GrievanceId,
    ) -> Result<Vec<GrievanceUpdate>, GrievanceStoreError>;

    /// Attachments linked to a grievance.
    async fn attachments(
        &self,
        grievance: GrievanceId,
    ) -> Result<Vec<Attachment>, GrievanceStoreError>;

    /// Grievances submitted by one user, newest first.
    async fn list_for_submitter(
        &self,
        submitter: UserId,
    ) -> Result<Vec<Grievance>, GrievanceStoreError>;

    /// Grievances assigned to any of the given departments, most recently
    /// updated first. An empty department list selects every grievance
    /// (the super-admin view).
    async fn list_for_departments(
        &self,
        departments: &[DepartmentId],
    ) -> Result<Vec<Grievance>, GrievanceStoreError>;

    /// Status analytics over the same scope as [`Self::list_for_departments`].
    async fn status_counts(
        &self,
        departments: &[DepartmentId],
    ) -> Result<StatusCounts, GrievanceStoreError>;

    /// Atomically set the status and append the recording ledger entry.
    async fn apply_transition(
        &self,
        grievance: GrievanceId,
        status: GrievanceStatus,
        entry: LedgerEntryDraft,
    ) -> Result<GrievanceUpdate, GrievanceStoreError>;

    /// Atomically append a comment; when `reopen` is set, also flip the
    /// status back to `Submitted` and append the synthetic status entry.
    /// Returns the appended entries in ledger order.
    async fn append_comment(
        &self,
        grievance: GrievanceId,
        entry: LedgerEntryDraft,
        reopen: Option<LedgerEntryDraft>,
    ) -> Result<Vec<GrievanceUpdate>, GrievanceStoreError>;
}
