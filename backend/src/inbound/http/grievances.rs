//! Grievance endpoints.
//!
//! ```text
//! POST /api/grievances
//! GET  /api/grievances/mine
//! GET  /api/grievances/{ticket_id}
//! POST /api/grievances/{ticket_id}/comments
//! PUT  /api/grievances/{ticket_id}/status
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::grievance::{Grievance, TicketId};
use crate::domain::ledger::GrievanceUpdate;
use crate::domain::services::{GrievanceDetail, NewGrievanceRequest, TransitionOutcome};
use crate::domain::transition::TransitionRequest;
use crate::domain::Error;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Submission request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub title: String,
    pub description: String,
    /// Category label, e.g. `academic` or `hostel`.
    pub category: String,
}

/// Comment request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub body: String,
}

fn parse_ticket(raw: &str) -> Result<TicketId, Error> {
    TicketId::parse(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// File a new grievance.
#[utoipa::path(
    post,
    path = "/api/grievances",
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Grievance created", body = Grievance),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Ticket allocation conflict", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["grievances"],
    operation_id = "submitGrievance"
)]
#[post("/grievances")]
pub async fn submit(
    ctx: AuthContext,
    state: web::Data<HttpState>,
    payload: web::Json<SubmitRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let created = state
        .grievances
        .submit(
            ctx.user_id,
            NewGrievanceRequest {
                title: payload.title,
                description: payload.description,
                category: payload.category,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// The caller's own grievances, newest first.
#[utoipa::path(
    get,
    path = "/api/grievances/mine",
    responses(
        (status = 200, description = "Submitted grievances", body = [Grievance]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["grievances"],
    operation_id = "listMyGrievances"
)]
#[get("/grievances/mine")]
pub async fn mine(
    ctx: AuthContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Grievance>>> {
    Ok(web::Json(state.grievances.mine(ctx.user_id).await?))
}

/// One grievance with its ordered history and attachments.
#[utoipa::path(
    get,
    path = "/api/grievances/{ticket_id}",
    params(("ticket_id" = String, Path, description = "External ticket identifier")),
    responses(
        (status = 200, description = "Grievance detail", body = GrievanceDetail),
        (status = 400, description = "Malformed ticket identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown ticket", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["grievances"],
    operation_id = "fetchGrievance"
)]
#[get("/grievances/{ticket_id}")]
pub async fn fetch(
    ctx: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<GrievanceDetail>> {
    let ticket = parse_ticket(&path)?;
    Ok(web::Json(state.grievances.fetch(ctx.user_id, &ticket).await?))
}

/// Append a comment to the grievance ledger.
///
/// A submitter reply while the grievance awaits clarification also reopens
/// it; both entries come back in ledger order.
#[utoipa::path(
    post,
    path = "/api/grievances/{ticket_id}/comments",
    params(("ticket_id" = String, Path, description = "External ticket identifier")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Appended ledger entries", body = [GrievanceUpdate]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown ticket", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["grievances"],
    operation_id = "commentOnGrievance"
)]
#[post("/grievances/{ticket_id}/comments")]
pub async fn comment(
    ctx: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let ticket = parse_ticket(&path)?;
    let appended = state
        .grievances
        .comment(ctx.user_id, &ticket, &payload.body)
        .await?;
    Ok(HttpResponse::Created().json(appended))
}

/// Change the grievance status (officers of the assigned department only).
#[utoipa::path(
    put,
    path = "/api/grievances/{ticket_id}/status",
    params(("ticket_id" = String, Path, description = "External ticket identifier")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Transition applied", body = TransitionOutcome),
        (status = 400, description = "Invalid transition", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown ticket", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["grievances"],
    operation_id = "updateGrievanceStatus"
)]
#[put("/grievances/{ticket_id}/status")]
pub async fn update_status(
    ctx: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TransitionRequest>,
) -> ApiResult<web::Json<TransitionOutcome>> {
    let ticket = parse_ticket(&path)?;
    let outcome = state
        .grievances
        .update_status(ctx.user_id, &ticket, &payload)
        .await?;
    Ok(web::Json(outcome))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use chrono::Utc;
    use serde_json::{json, Value};

    use crate::domain::department::DepartmentId;
    use crate::domain::grievance::{
        AssignedGrievance, Grievance, GrievanceId, GrievanceStatus, TicketId,
    };
    use crate::domain::user::{Role, RoleAssignment, UserId};
    use crate::inbound::http::auth::AUTH_TOKEN_HEADER;
    use crate::inbound::http::test_utils::{self, expect_active_caller, Mocks};

    fn stored(submitter: UserId) -> AssignedGrievance {
        let now = Utc::now();
        AssignedGrievance {
            grievance: Grievance {
                id: GrievanceId::random(),
                ticket_id: TicketId::parse("GRM2608301234").expect("valid ticket"),
                title: "Mess food quality".to_owned(),
                description: "Dinner has been cold for a week".to_owned(),
                category: "Hostel".to_owned(),
                status: GrievanceStatus::Submitted,
                submitted_by: submitter,
                created_at: now,
                updated_at: now,
            },
            department: DepartmentId(2),
        }
    }

    #[actix_web::test]
    async fn submit_returns_201_with_the_created_grievance() {
        let caller = UserId::random();
        let mut mocks = Mocks::default();
        expect_active_caller(
            &mut mocks.directory,
            vec![RoleAssignment::global(Role::Student)],
        );
        mocks.store.expect_create().return_once(|new| {
            let now = Utc::now();
            Ok(Grievance {
                id: GrievanceId::random(),
                ticket_id: new.ticket_id.clone(),
                title: new.title.clone(),
                description: new.description.clone(),
                category: new.category.clone(),
                status: GrievanceStatus::Submitted,
                submitted_by: new.submitted_by,
                created_at: now,
                updated_at: now,
            })
        });
        let state = test_utils::state(mocks);
        let token = test_utils::token_for(&state, caller);

        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::inbound::http::configure),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/api/grievances")
            .insert_header((AUTH_TOKEN_HEADER, token))
            .set_json(json!({
                "title": "Mess food quality",
                "description": "Dinner has been cold for a week",
                "category": "hostel"
            }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["category"], "Hostel");
        assert_eq!(body["status"], "Submitted");
    }

    #[actix_web::test]
    async fn malformed_ticket_ids_are_rejected_up_front() {
        let caller = UserId::random();
        let mut mocks = Mocks::default();
        expect_active_caller(
            &mut mocks.directory,
            vec![RoleAssignment::global(Role::Student)],
        );
        let state = test_utils::state(mocks);
        let token = test_utils::token_for(&state, caller);

        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::inbound::http::configure),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/api/grievances/not-a-ticket")
            .insert_header((AUTH_TOKEN_HEADER, token))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn owners_get_403_when_changing_status() {
        let caller = UserId::random();
        let mut mocks = Mocks::default();
        expect_active_caller(
            &mut mocks.directory,
            vec![RoleAssignment::global(Role::Student)],
        );
        let found = stored(caller);
        mocks
            .store
            .expect_find_by_ticket()
            .return_once(move |_| Ok(Some(found)));
        let state = test_utils::state(mocks);
        let token = test_utils::token_for(&state, caller);

        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::inbound::http::configure),
        )
        .await;
        let req = actix_test::TestRequest::put()
            .uri("/api/grievances/GRM2608301234/status")
            .insert_header((AUTH_TOKEN_HEADER, token))
            .set_json(json!({ "status": "Resolved" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn unknown_tickets_surface_404() {
        let caller = UserId::random();
        let mut mocks = Mocks::default();
        expect_active_caller(
            &mut mocks.directory,
            vec![RoleAssignment::global(Role::Student)],
        );
        mocks
            .store
            .expect_find_by_ticket()
            .return_once(|_| Ok(None));
        let state = test_utils::state(mocks);
        let token = test_utils::token_for(&state, caller);

        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::inbound::http::configure),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/api/grievances/GRM2608309999")
            .insert_header((AUTH_TOKEN_HEADER, token))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
