//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into consistent JSON envelopes and status codes.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TRACE_ID_HEADER;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Internal and availability failures carry adapter detail (pool messages,
/// connection strings) that must not reach clients; everything else is
/// already phrased for the caller.
fn redact(error: &Error) -> Error {
    let generic = match error.code() {
        ErrorCode::InternalError => Error::internal("Internal server error"),
        ErrorCode::ServiceUnavailable => Error::service_unavailable("Service unavailable"),
        _ => return error.clone(),
    };
    let mut redacted = generic;
    redacted.trace_id.clone_from(&error.trace_id);
    redacted
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id.as_deref() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    #[rstest]
    #[case(Error::invalid_request("bad"), 400)]
    #[case(Error::unauthorized("no token"), 401)]
    #[case(Error::forbidden("denied"), 403)]
    #[case(Error::not_found("missing"), 404)]
    #[case(Error::conflict("duplicate"), 409)]
    #[case(Error::service_unavailable("pool down"), 503)]
    #[case(Error::internal("boom"), 500)]
    fn codes_map_to_status(#[case] error: Error, #[case] status: u16) {
        assert_eq!(error.status_code().as_u16(), status);
    }

    #[tokio::test]
    async fn internal_messages_are_redacted() {
        let error = Error::internal("diesel blew up: secret dsn");
        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["code"], "internal_error");
    }

    #[tokio::test]
    async fn unavailable_messages_are_redacted() {
        let error =
            Error::service_unavailable("grievance store unavailable: pool timed out at 10.0.0.7");
        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["message"], "Service unavailable");
        assert_eq!(json["code"], "service_unavailable");
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let error = Error::conflict("the user already holds this role assignment");
        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["message"], "the user already holds this role assignment");
    }

    #[test]
    fn trace_id_is_echoed_as_a_header() {
        let error = Error::invalid_request("bad").with_trace_id("abc-123");
        let response = error.error_response();
        assert_eq!(
            response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("abc-123")
        );
    }
}
