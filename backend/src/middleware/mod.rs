//! Request middleware.
//!
//! Request lifecycle concerns that sit outside individual handlers, currently
//! the per-request trace identifier.

pub mod trace;

pub use trace::Trace;
