//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Following the hexagonal layout, every adapter here is a thin translator
//! between domain types and an infrastructure concern:
//!
//! - **persistence**: PostgreSQL-backed stores and directories via Diesel
//! - **registry**: in-process live WebSocket connection registry
//! - **mailer**: outbound email delivery
//!
//! Adapters contain no business logic; lifecycle rules, access checks, and
//! fan-out decisions all live in the domain services.

pub mod mailer;
pub mod persistence;
pub mod registry;
