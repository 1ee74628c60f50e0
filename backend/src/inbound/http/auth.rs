//! Bearer-token authentication for the REST and WebSocket adapters.
//!
//! Tokens are HMAC-SHA256 JWTs carrying only the user id and validity
//! window. Roles are deliberately absent: authorization re-reads the
//! directory on every request, so a token minted before a role change or a
//! deactivation confers nothing after it.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures_util::future::{ready, Ready};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;

use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

/// Request header carrying the token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Signs and verifies authentication tokens.
#[derive(Clone)]
pub struct TokenCodec {
    key: Hmac<Sha256>,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from the shared secret and token lifetime.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, Error> {
        let key = Hmac::new_from_slice(secret.as_bytes())
            .map_err(|err| Error::internal(format!("invalid token secret: {err}")))?;
        Ok(Self { key, ttl })
    }

    /// Mint a token for `user` valid from `now` for the configured lifetime.
    pub fn issue(&self, user: UserId, now: DateTime<Utc>) -> Result<String, Error> {
        let expires = now + self.ttl;
        let claims = Claims::new(RegisteredClaims {
            subject: Some(user.to_string()),
            issued_at: Some(now.timestamp().unsigned_abs()),
            expiration: Some(expires.timestamp().unsigned_abs()),
            ..RegisteredClaims::default()
        });
        claims
            .sign_with_key(&self.key)
            .map_err(|err| Error::internal(format!("token signing failed: {err}")))
    }

    /// Verify a token's signature and validity window, returning the user id.
    pub fn verify(&self, token: &str) -> Result<UserId, Error> {
        let rejected = || Error::unauthorized("invalid or expired token");

        let token: Token<Header, Claims, _> =
            token.verify_with_key(&self.key).map_err(|_| rejected())?;
        let registered = &token.claims().registered;
        let now = Utc::now();

        let issued_at = registered
            .issued_at
            .and_then(|ts| Utc.timestamp_opt(ts as i64, 0).single())
            .ok_or_else(rejected)?;
        if issued_at > now {
            return Err(rejected());
        }
        let expiration = registered
            .expiration
            .and_then(|ts| Utc.timestamp_opt(ts as i64, 0).single())
            .ok_or_else(rejected)?;
        if expiration < now {
            return Err(rejected());
        }

        registered
            .subject
            .as_deref()
            .and_then(|subject| subject.parse().ok())
            .ok_or_else(rejected)
    }
}

/// The authenticated caller, extracted from the `x-auth-token` header.
///
/// Extraction proves possession of a valid token only; the services behind
/// the handler re-check the account's active flag and roles.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: UserId,
}

fn authenticate(req: &HttpRequest) -> Result<AuthContext, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state not configured"))?;
    let token = req
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::unauthorized("missing authentication token"))?;
    let user_id = state.tokens.verify(token)?;
    Ok(AuthContext { user_id })
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
