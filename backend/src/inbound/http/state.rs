//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`, so they depend on
//! domain services only and stay testable with mocked ports.

use std::sync::Arc;

use crate::domain::services::{
    AdminService, AuthService, DepartmentService, GrievanceService, NotificationService,
};
use crate::inbound::http::auth::TokenCodec;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<AuthService>,
    pub grievances: Arc<GrievanceService>,
    pub notifications: Arc<NotificationService>,
    pub departments: Arc<DepartmentService>,
    pub admin: Arc<AdminService>,
    pub tokens: TokenCodec,
}
