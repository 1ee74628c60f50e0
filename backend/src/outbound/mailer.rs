//! Log-only mailer adapter.
//!
//! Stands in for a real SMTP integration: every message is written to the
//! structured log instead of being delivered. Email is best effort in this
//! system, so swapping in a real transport later only touches this adapter.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{EmailMessage, Mailer, MailerError};

/// Mailer that records messages in the application log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyMailer;

impl LogOnlyMailer {
    /// Create a new log-only mailer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogOnlyMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body_len = message.body.len(),
            "email delivery (log only)"
        );
        Ok(())
    }
}
