//! Department reference-data endpoint.

use actix_web::{get, web};

use crate::domain::department::Department;
use crate::domain::Error;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// All departments, for the submission form dropdown.
#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "Departments", body = [Department]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["departments"],
    operation_id = "listDepartments"
)]
#[get("/departments")]
pub async fn list(
    _ctx: AuthContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Department>>> {
    Ok(web::Json(state.departments.list().await?))
}
