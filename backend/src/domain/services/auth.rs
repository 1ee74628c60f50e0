//! Login and current-user resolution.

use std::sync::Arc;

use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};

use crate::domain::error::Error;
use crate::domain::ports::RoleDirectory;
use crate::domain::user::{RoleAssignment, User, UserId};

use super::map_directory_error;

/// A verified user together with their current role assignments.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user: User,
    pub roles: Vec<RoleAssignment>,
}

/// Credential verification against the directory.
#[derive(Clone)]
pub struct AuthService {
    directory: Arc<dyn RoleDirectory>,
}

impl AuthService {
    pub fn new(directory: Arc<dyn RoleDirectory>) -> Self {
        Self { directory }
    }

    /// Verify email and password.
    ///
    /// Unknown emails and wrong passwords fail identically so the endpoint
    /// does not disclose which accounts exist. Deactivated accounts are
    /// refused even with correct credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, Error> {
        let rejected = || Error::unauthorized("invalid email or password");

        let credentials = self
            .directory
            .find_credentials(email)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(rejected)?;

        let hash = PasswordHash::new(&credentials.password_hash)
            .map_err(|err| Error::internal(format!("stored password hash is malformed: {err}")))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .map_err(|_| rejected())?;

        if !credentials.user.is_active {
            return Err(Error::unauthorized("account is deactivated"));
        }

        let roles = self
            .directory
            .roles_for(credentials.user.id)
            .await
            .map_err(map_directory_error)?;
        Ok(AuthenticatedUser {
            user: credentials.user,
            roles,
        })
    }

    /// Resolve the profile behind an already-authenticated token.
    pub async fn current_user(&self, id: UserId) -> Result<AuthenticatedUser, Error> {
        let user = self
            .directory
            .find_user(id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::unauthorized("unknown user"))?;
        if !user.is_active {
            return Err(Error::unauthorized("account is deactivated"));
        }
        let roles = self
            .directory
            .roles_for(id)
            .await
            .map_err(map_directory_error)?;
        Ok(AuthenticatedUser { user, roles })
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
