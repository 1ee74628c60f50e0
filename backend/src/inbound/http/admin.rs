//! Super-admin user administration endpoints.
//!
//! ```text
//! GET  /api/admin/users
//! PUT  /api/admin/users/{id}/deactivate
//! PUT  /api/admin/users/{id}/reactivate
//! POST /api/admin/users/{id}/roles
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::department::DepartmentId;
use crate::domain::ports::UserAccount;
use crate::domain::user::{Role, RoleAssignment, User, UserId};
use crate::domain::Error;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// One user account as listed for administrators.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAccountResponse {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub roles: Vec<RoleAssignment>,
}

impl From<UserAccount> for UserAccountResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.user.id,
            full_name: account.user.full_name,
            email: account.user.email,
            is_active: account.user.is_active,
            roles: account.roles,
        }
    }
}

/// Role grant request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub role: Role,
    /// Required for officer roles, refused for global roles.
    pub department: Option<DepartmentId>,
}

/// All user accounts with their role sets.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "User accounts", body = [UserAccountResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrator role required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    ctx: AuthContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserAccountResponse>>> {
    let accounts = state.admin.list_users(ctx.user_id).await?;
    Ok(web::Json(accounts.into_iter().map(Into::into).collect()))
}

/// Deactivate an account (soft delete).
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/deactivate",
    params(("id" = UserId, Path, description = "Target user")),
    responses(
        (status = 200, description = "Deactivated user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrator role required", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deactivateUser"
)]
#[put("/admin/users/{id}/deactivate")]
pub async fn deactivate(
    ctx: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<User>> {
    let updated = state
        .admin
        .deactivate(ctx.user_id, path.into_inner())
        .await?;
    Ok(web::Json(updated))
}

/// Reactivate a previously deactivated account.
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/reactivate",
    params(("id" = UserId, Path, description = "Target user")),
    responses(
        (status = 200, description = "Reactivated user", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrator role required", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "reactivateUser"
)]
#[put("/admin/users/{id}/reactivate")]
pub async fn reactivate(
    ctx: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<User>> {
    let updated = state
        .admin
        .reactivate(ctx.user_id, path.into_inner())
        .await?;
    Ok(web::Json(updated))
}

/// Grant a role, optionally scoped to a department.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/roles",
    params(("id" = UserId, Path, description = "Target user")),
    request_body = AssignRoleRequest,
    responses(
        (status = 204, description = "Role assigned"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrator role required", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 409, description = "Assignment already exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "assignRole"
)]
#[post("/admin/users/{id}/roles")]
pub async fn assign_role(
    ctx: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
    payload: web::Json<AssignRoleRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    state
        .admin
        .assign_role(ctx.user_id, path.into_inner(), payload.role, payload.department)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
