//! WebSocket inbound adapter streaming notification pushes to clients.
//!
//! Browsers cannot set custom headers on upgrade requests, so the token
//! rides in the query string. The upgrade re-checks the account's active
//! flag; a deactivated user cannot hold a live connection open.

mod session;
pub mod state;

use actix_web::web::{self, Payload};
use actix_web::{get, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::debug;

use crate::domain::Error;

pub use state::WsState;

#[derive(Debug, Deserialize)]
struct UpgradeQuery {
    token: String,
}

/// Handle the WebSocket upgrade for `GET /ws?token=...`.
#[get("/ws")]
pub async fn entry(
    state: web::Data<WsState>,
    query: web::Query<UpgradeQuery>,
    req: HttpRequest,
    body: Payload,
) -> Result<HttpResponse, Error> {
    let user_id = state.tokens.verify(&query.token)?;
    state.auth.current_user(user_id).await?;

    let (response, session, stream) = actix_ws::handle(&req, body)
        .map_err(|err| Error::internal(format!("WebSocket upgrade failed: {err}")))?;
    debug!(user = %user_id, "websocket connection established");

    let registry = state.registry.clone();
    actix_web::rt::spawn(session::run(registry, user_id, session, stream));
    Ok(response)
}
