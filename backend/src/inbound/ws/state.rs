//! Shared WebSocket adapter state.

use std::sync::Arc;

use crate::domain::ports::ConnectionRegistry;
use crate::domain::services::AuthService;
use crate::inbound::http::auth::TokenCodec;

/// Dependency bundle for the WebSocket entry point.
#[derive(Clone)]
pub struct WsState {
    pub registry: Arc<dyn ConnectionRegistry>,
    pub auth: Arc<AuthService>,
    pub tokens: TokenCodec,
}
