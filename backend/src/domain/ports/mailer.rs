//! Outbound email port (best effort).

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Delivery errors raised by mailer adapters.
    pub enum MailerError {
        /// The message could not be handed to the delivery backend.
        Delivery { message: String } => "email delivery failed: {message}",
    }
}

/// Email to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message. Callers treat failures as log-and-continue; email
    /// never gates the parent operation.
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError>;
}
