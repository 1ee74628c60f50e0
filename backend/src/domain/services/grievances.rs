//! Grievance use cases: submission, retrieval, comments, transitions, and
//! the officer queue.

use std::sync::Arc;

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::department::{Category, DepartmentId};
use crate::domain::dispatch::NotificationEvent;
use crate::domain::error::Error;
use crate::domain::grievance::{
    AssignedGrievance, Attachment, Grievance, StatusCounts, TicketId,
};
use crate::domain::ledger::{GrievanceUpdate, LedgerEntryDraft, UpdateKind};
use crate::domain::ports::{GrievanceStore, GrievanceStoreError, NewGrievance, RoleDirectory};
use crate::domain::transition::{self, TransitionRequest};
use crate::domain::user::{RoleAssignment, UserId};

use super::{resolve_caller, Caller, NotificationDispatcher};

/// Regenerations attempted when a ticket identifier collides.
const TICKET_ATTEMPTS: usize = 5;

/// Submission payload after transport-level deserialization.
#[derive(Debug, Clone)]
pub struct NewGrievanceRequest {
    pub title: String,
    pub description: String,
    pub category: String,
}

/// A grievance with everything its detail view needs.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrievanceDetail {
    #[serde(flatten)]
    pub grievance: Grievance,
    pub department: DepartmentId,
    pub updates: Vec<GrievanceUpdate>,
    pub attachments: Vec<Attachment>,
    /// Whether the caller may change the status (drives the officer UI).
    pub can_manage: bool,
}

/// Officer queue plus the dashboard analytics over the same scope.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfficerDashboard {
    pub grievances: Vec<Grievance>,
    pub analytics: StatusCounts,
}

/// Result of an accepted status transition.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub grievance: Grievance,
    pub entry: GrievanceUpdate,
}

/// The grievance lifecycle service.
#[derive(Clone)]
pub struct GrievanceService {
    store: Arc<dyn GrievanceStore>,
    directory: Arc<dyn RoleDirectory>,
    dispatcher: Arc<NotificationDispatcher>,
}

fn map_store_error(error: GrievanceStoreError) -> Error {
    match error {
        GrievanceStoreError::Connection { message } => {
            Error::service_unavailable(format!("grievance store unavailable: {message}"))
        }
        GrievanceStoreError::Query { message } => {
            Error::internal(format!("grievance store error: {message}"))
        }
        GrievanceStoreError::DuplicateTicket { ticket } => {
            Error::conflict(format!("ticket identifier already in use: {ticket}"))
        }
    }
}

fn required_text(value: &str, field: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::invalid_request(format!("{field} must not be empty")))
    } else {
        Ok(trimmed.to_owned())
    }
}

impl GrievanceService {
    pub fn new(
        store: Arc<dyn GrievanceStore>,
        directory: Arc<dyn RoleDirectory>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            store,
            directory,
            dispatcher,
        }
    }

    /// Submit a new grievance, routing it to the category's department.
    ///
    /// Ticket identifiers carry only four random digits, so collisions
    /// within a day are plausible; the unique index catches them and the
    /// identifier is regenerated a bounded number of times.
    pub async fn submit(
        &self,
        caller: UserId,
        request: NewGrievanceRequest,
    ) -> Result<Grievance, Error> {
        resolve_caller(self.directory.as_ref(), caller).await?;

        let title = required_text(&request.title, "title")?;
        let description = required_text(&request.description, "description")?;
        let category: Category = request.category.parse().map_err(|_| {
            Error::invalid_request(format!("unknown grievance category: {}", request.category))
        })?;

        let mut rng = SmallRng::from_entropy();
        let mut last_collision = None;
        for _ in 0..TICKET_ATTEMPTS {
            let grievance = NewGrievance {
                ticket_id: TicketId::generate(Utc::now(), &mut rng),
                title: title.clone(),
                description: description.clone(),
                category: category.as_str().to_owned(),
                submitted_by: caller,
                assigned_department: category.department(),
            };
            match self.store.create(&grievance).await {
                Ok(created) => return Ok(created),
                Err(err @ GrievanceStoreError::DuplicateTicket { .. }) => {
                    last_collision = Some(err);
                }
                Err(err) => return Err(map_store_error(err)),
            }
        }
        Err(map_store_error(last_collision.unwrap_or_else(|| {
            GrievanceStoreError::DuplicateTicket {
                ticket: String::new(),
            }
        })))
    }

    /// Fetch a grievance with its ordered history and attachments.
    pub async fn fetch(&self, caller: UserId, ticket: &TicketId) -> Result<GrievanceDetail, Error> {
        let caller = resolve_caller(self.directory.as_ref(), caller).await?;
        let found = self.find(ticket).await?;
        let access = caller.capabilities.access_to(&found);
        if !access.read {
            return Err(Error::unauthorized(
                "you are not allowed to view this grievance",
            ));
        }

        let updates = self
            .store
            .history(found.grievance.id)
            .await
            .map_err(map_store_error)?;
        let attachments = self
            .store
            .attachments(found.grievance.id)
            .await
            .map_err(map_store_error)?;
        Ok(GrievanceDetail {
            grievance: found.grievance,
            department: found.department,
            updates,
            attachments,
            can_manage: access.manage,
        })
    }

    /// Append a comment; a submitter reply while awaiting clarification also
    /// reopens the grievance in the same transaction.
    pub async fn comment(
        &self,
        caller_id: UserId,
        ticket: &TicketId,
        body: &str,
    ) -> Result<Vec<GrievanceUpdate>, Error> {
        let caller = resolve_caller(self.directory.as_ref(), caller_id).await?;
        let body = required_text(body, "comment")?;
        let found = self.find(ticket).await?;
        if !caller.capabilities.access_to(&found).comment {
            return Err(Error::forbidden(
                "you are not allowed to comment on this grievance",
            ));
        }

        let author_is_owner = found.grievance.submitted_by == caller_id;
        let role = acting_role(&caller, found.department);
        let entry = LedgerEntryDraft::comment(caller_id, role, body);
        let reopen = transition::reopens_on_comment(found.grievance.status, author_is_owner)
            .then(|| {
                LedgerEntryDraft::status_change(caller_id, role, transition::reopen_entry_body())
            });

        let appended = self
            .store
            .append_comment(found.grievance.id, entry, reopen)
            .await
            .map_err(map_store_error)?;

        // Dispatch after the commit; the reopen does not add a second event.
        let event = if author_is_owner {
            NotificationEvent::SubmitterCommented
        } else {
            NotificationEvent::OfficerCommented
        };
        self.dispatcher.dispatch(event, caller_id, &found).await;
        Ok(appended)
    }

    /// Apply a status transition requested by an authorised officer.
    pub async fn update_status(
        &self,
        caller_id: UserId,
        ticket: &TicketId,
        request: &TransitionRequest,
    ) -> Result<TransitionOutcome, Error> {
        let caller = resolve_caller(self.directory.as_ref(), caller_id).await?;
        let found = self.find(ticket).await?;
        if !caller.capabilities.access_to(&found).manage {
            return Err(Error::forbidden(
                "you are not allowed to change this grievance's status",
            ));
        }

        let plan = transition::plan(found.grievance.status, request)?;
        let role = acting_role(&caller, found.department);
        let entry = match plan.entry_kind {
            UpdateKind::Comment => LedgerEntryDraft::comment(caller_id, role, plan.entry_body),
            UpdateKind::StatusChange => {
                LedgerEntryDraft::status_change(caller_id, role, plan.entry_body)
            }
        };

        let recorded = self
            .store
            .apply_transition(found.grievance.id, plan.to, entry)
            .await
            .map_err(map_store_error)?;

        let mut grievance = found.grievance.clone();
        grievance.status = plan.to;
        grievance.updated_at = recorded.created_at;

        self.dispatcher
            .dispatch(
                NotificationEvent::StatusChanged { to: plan.to },
                caller_id,
                &found,
            )
            .await;
        Ok(TransitionOutcome {
            grievance,
            entry: recorded,
        })
    }

    /// The caller's own grievances, newest first.
    pub async fn mine(&self, caller: UserId) -> Result<Vec<Grievance>, Error> {
        resolve_caller(self.directory.as_ref(), caller).await?;
        self.store
            .list_for_submitter(caller)
            .await
            .map_err(map_store_error)
    }

    /// The officer queue with its status analytics.
    ///
    /// Super admins see every department; officers see the grievances
    /// assigned to theirs.
    pub async fn officer_queue(&self, caller: UserId) -> Result<OfficerDashboard, Error> {
        let caller = resolve_caller(self.directory.as_ref(), caller).await?;
        if !caller.capabilities.is_officer() {
            return Err(Error::forbidden("officer role required"));
        }
        let departments: Vec<DepartmentId> = if caller.capabilities.is_super_admin() {
            Vec::new()
        } else {
            caller.capabilities.officer_departments().collect()
        };

        let grievances = self
            .store
            .list_for_departments(&departments)
            .await
            .map_err(map_store_error)?;
        let analytics = self
            .store
            .status_counts(&departments)
            .await
            .map_err(map_store_error)?;
        Ok(OfficerDashboard {
            grievances,
            analytics,
        })
    }

    async fn find(&self, ticket: &TicketId) -> Result<AssignedGrievance, Error> {
        self.store
            .find_by_ticket(ticket)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("no grievance with ticket {ticket}")))
    }
}

fn acting_role(caller: &Caller, department: DepartmentId) -> crate::domain::user::Role {
    RoleAssignment::acting_role(&caller.assignments, department)
}

#[cfg(test)]
#[path = "grievances_tests.rs"]
mod tests;
