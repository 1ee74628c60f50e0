//! Grievance redressal backend.
//!
//! The crate is organised hexagonally: `domain` holds the grievance
//! lifecycle engine (state machine, access control, notification fan-out)
//! behind port traits, `inbound` exposes the HTTP and WebSocket adapters,
//! and `outbound` provides the Diesel, registry, and mailer adapters.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::trace::Trace;
