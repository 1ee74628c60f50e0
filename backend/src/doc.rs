//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every HTTP endpoint from the inbound layer, the domain
//! schemas they exchange, and the token header security scheme.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::services::{GrievanceDetail, OfficerDashboard, TransitionOutcome};
use crate::domain::transition::TransitionRequest;
use crate::domain::{
    Attachment, Department, Error, ErrorCode, Grievance, GrievanceStatus, GrievanceUpdate,
    Notification, Role, RoleAssignment, StatusCounts, UpdateKind, User,
};
use crate::inbound::http::admin::{AssignRoleRequest, UserAccountResponse};
use crate::inbound::http::auth::AUTH_TOKEN_HEADER;
use crate::inbound::http::grievances::{CommentRequest, SubmitRequest};
use crate::inbound::http::users::{LoginRequest, LoginResponse, ProfileResponse};

/// Enrich the generated document with the token header security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AuthToken",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                AUTH_TOKEN_HEADER,
                "Signed token issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the grievance portal REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Grievance portal backend API",
        description = "HTTP interface for grievance submission, tracking, and administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("AuthToken" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::me,
        crate::inbound::http::grievances::submit,
        crate::inbound::http::grievances::mine,
        crate::inbound::http::grievances::fetch,
        crate::inbound::http::grievances::comment,
        crate::inbound::http::grievances::update_status,
        crate::inbound::http::officer::queue,
        crate::inbound::http::departments::list,
        crate::inbound::http::notifications::recent,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::deactivate,
        crate::inbound::http::admin::reactivate,
        crate::inbound::http::admin::assign_role,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Role,
        RoleAssignment,
        Department,
        Grievance,
        GrievanceStatus,
        GrievanceUpdate,
        UpdateKind,
        Attachment,
        StatusCounts,
        Notification,
        GrievanceDetail,
        OfficerDashboard,
        TransitionOutcome,
        TransitionRequest,
        LoginRequest,
        LoginResponse,
        ProfileResponse,
        SubmitRequest,
        CommentRequest,
        UserAccountResponse,
        AssignRoleRequest,
    )),
    tags(
        (name = "auth", description = "Login and identity"),
        (name = "grievances", description = "Grievance submission and lifecycle"),
        (name = "officer", description = "Officer work queue and analytics"),
        (name = "departments", description = "Department reference data"),
        (name = "notifications", description = "Per-user notification feed"),
        (name = "admin", description = "User and role administration")
    )
)]
pub struct ApiDoc;
