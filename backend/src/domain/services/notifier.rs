//! Notification dispatch: durable rows first, live push and email after.
//!
//! Dispatch runs strictly after the grievance transaction commits and never
//! fails the parent operation: every delivery problem is logged and
//! swallowed. Durability comes from the persisted rows; the push and the
//! email are accelerators.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::dispatch::{self, NotificationEvent};
use crate::domain::grievance::AssignedGrievance;
use crate::domain::notification::NewNotification;
use crate::domain::ports::{
    ConnectionRegistry, EmailMessage, Mailer, NotificationRepository, PushEvent, RoleDirectory,
};
use crate::domain::user::UserId;

/// Fans one ledger event out to its recipients.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
    directory: Arc<dyn RoleDirectory>,
    registry: Arc<dyn ConnectionRegistry>,
    mailer: Arc<dyn Mailer>,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        directory: Arc<dyn RoleDirectory>,
        registry: Arc<dyn ConnectionRegistry>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            notifications,
            directory,
            registry,
            mailer,
        }
    }

    /// Notify everyone affected by `event` on `grievance`, except `actor`.
    pub async fn dispatch(
        &self,
        event: NotificationEvent,
        actor: UserId,
        grievance: &AssignedGrievance,
    ) {
        let ticket = &grievance.grievance.ticket_id;
        let audience = match self.audience_for(event, grievance).await {
            Ok(audience) => audience,
            Err(err) => {
                warn!(ticket = %ticket, error = %err, "could not resolve notification audience");
                return;
            }
        };

        let recipients = dispatch::recipients(event, actor, &audience);
        if recipients.is_empty() {
            debug!(ticket = %ticket, "notification event has no recipients");
            return;
        }

        let message = dispatch::message(event, ticket);
        let link = dispatch::link(ticket);
        let rows: Vec<NewNotification> = recipients
            .iter()
            .map(|user_id| NewNotification {
                user_id: *user_id,
                message: message.clone(),
                link: link.clone(),
            })
            .collect();
        if let Err(err) = self.notifications.insert_all(&rows).await {
            warn!(ticket = %ticket, error = %err, "could not persist notifications");
            return;
        }

        for recipient in &recipients {
            if !self.registry.push(*recipient, PushEvent::NewNotification) {
                debug!(ticket = %ticket, user = %recipient, "no live connection for push");
            }
        }

        // Status changes addressed to the submitter also go out by email.
        if matches!(event, NotificationEvent::StatusChanged { .. })
            && recipients.contains(&audience.submitter)
        {
            self.email_submitter(audience.submitter, ticket.as_str(), &message)
                .await;
        }
    }

    async fn audience_for(
        &self,
        event: NotificationEvent,
        grievance: &AssignedGrievance,
    ) -> Result<dispatch::Audience, crate::domain::ports::DirectoryError> {
        use crate::domain::grievance::GrievanceStatus;

        let department_officers = match event {
            NotificationEvent::SubmitterCommented => {
                self.directory.officers_of(grievance.department).await?
            }
            _ => Vec::new(),
        };
        let super_admins = match event {
            NotificationEvent::StatusChanged {
                to: GrievanceStatus::Escalated,
            } => self.directory.super_admins().await?,
            _ => Vec::new(),
        };
        Ok(dispatch::Audience {
            submitter: grievance.grievance.submitted_by,
            department_officers,
            super_admins,
        })
    }

    async fn email_submitter(&self, submitter: UserId, ticket: &str, message: &str) {
        let user = match self.directory.find_user(submitter).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(err) => {
                warn!(ticket, error = %err, "could not look up submitter for email");
                return;
            }
        };
        let email = EmailMessage {
            to: user.email,
            subject: format!("Update on grievance {ticket}"),
            body: message.to_owned(),
        };
        if let Err(err) = self.mailer.send(&email).await {
            warn!(ticket, error = %err, "email delivery failed");
        }
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
