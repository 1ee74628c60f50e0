//! Officer dashboard endpoint.

use actix_web::{get, web};

use crate::domain::services::OfficerDashboard;
use crate::domain::Error;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// The officer queue with its status analytics.
///
/// Super admins see every department; officers see grievances assigned to
/// theirs, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/officer/grievances",
    responses(
        (status = 200, description = "Queue and analytics", body = OfficerDashboard),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Officer role required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["officer"],
    operation_id = "officerQueue"
)]
#[get("/officer/grievances")]
pub async fn queue(
    ctx: AuthContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<OfficerDashboard>> {
    Ok(web::Json(state.grievances.officer_queue(ctx.user_id).await?))
}
