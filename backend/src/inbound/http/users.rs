//! Authentication endpoints.
//!
//! ```text
//! POST /api/auth/login {"email":"...","password":"..."}
//! GET  /api/auth/me
//! ```

use actix_web::{get, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::services::AuthenticatedUser;
use crate::domain::{Error, RoleAssignment, UserId};
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Login request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The caller's profile with their current role assignments.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub roles: Vec<RoleAssignment>,
}

impl From<AuthenticatedUser> for ProfileResponse {
    fn from(authenticated: AuthenticatedUser) -> Self {
        Self {
            id: authenticated.user.id,
            full_name: authenticated.user.full_name,
            email: authenticated.user.email,
            roles: authenticated.roles,
        }
    }
}

/// Successful login: the bearer token plus the profile behind it.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: ProfileResponse,
}

/// Verify credentials and mint a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let payload = payload.into_inner();
    if payload.email.trim().is_empty() {
        return Err(Error::invalid_request("email must not be empty"));
    }
    if payload.password.is_empty() {
        return Err(Error::invalid_request("password must not be empty"));
    }
    let authenticated = state.auth.login(payload.email.trim(), &payload.password).await?;
    let token = state.tokens.issue(authenticated.user.id, Utc::now())?;
    Ok(web::Json(LoginResponse {
        token,
        user: authenticated.into(),
    }))
}

/// The profile behind the presented token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(
    ctx: AuthContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let authenticated = state.auth.current_user(ctx.user_id).await?;
    Ok(web::Json(authenticated.into()))
}
