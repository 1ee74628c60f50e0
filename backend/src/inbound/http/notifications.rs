//! Notification feed endpoints.
//!
//! ```text
//! GET /api/notifications
//! PUT /api/notifications/mark-read
//! PUT /api/notifications/{id}/read
//! ```

use actix_web::{get, put, web, HttpResponse};
use uuid::Uuid;

use crate::domain::notification::Notification;
use crate::domain::Error;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// The caller's most recent notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Recent notifications", body = [Notification]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn recent(
    ctx: AuthContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Notification>>> {
    Ok(web::Json(state.notifications.recent(ctx.user_id).await?))
}

/// Mark every unread notification as read.
#[utoipa::path(
    put,
    path = "/api/notifications/mark-read",
    responses(
        (status = 204, description = "All notifications marked read"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[put("/notifications/mark-read")]
pub async fn mark_all_read(
    ctx: AuthContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    state.notifications.mark_all_read(ctx.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark one notification as read.
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification identifier")),
    responses(
        (status = 204, description = "Notification marked read"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[put("/notifications/{id}/read")]
pub async fn mark_read(
    ctx: AuthContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .notifications
        .mark_read(ctx.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use mockall::predicate::eq;
    use uuid::Uuid;

    use crate::domain::user::UserId;
    use crate::inbound::http::auth::AUTH_TOKEN_HEADER;
    use crate::inbound::http::test_utils::{self, expect_active_caller, Mocks};

    #[actix_web::test]
    async fn mark_read_returns_204_and_scopes_to_the_caller() {
        let caller = UserId::random();
        let id = Uuid::new_v4();
        let mut mocks = Mocks::default();
        expect_active_caller(&mut mocks.directory, Vec::new());
        mocks
            .notifications
            .expect_mark_read()
            .with(eq(id), eq(caller))
            .return_once(|_, _| Ok(()));
        let state = test_utils::state(mocks);
        let token = test_utils::token_for(&state, caller);

        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::inbound::http::configure),
        )
        .await;
        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/notifications/{id}/read"))
            .insert_header((AUTH_TOKEN_HEADER, token))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn the_feed_requires_a_token() {
        let state = test_utils::state(Mocks::default());
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::inbound::http::configure),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/api/notifications")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
