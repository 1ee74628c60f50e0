//! Role/department directory port.
//!
//! Authorization re-reads this directory on every gated operation instead of
//! trusting the login-time token snapshot, so role changes and deactivation
//! take effect immediately.

use async_trait::async_trait;

use crate::domain::department::DepartmentId;
use crate::domain::user::{RoleAssignment, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by directory adapters.
    pub enum DirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } => "directory connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "directory query failed: {message}",
    }
}

/// Credentials record used by the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: User,
    /// Argon2 password hash string.
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, DirectoryError>;

    /// Fetch a user with their password hash by email (login only).
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, DirectoryError>;

    /// Current role assignments for a user.
    async fn roles_for(&self, id: UserId) -> Result<Vec<RoleAssignment>, DirectoryError>;

    /// Active users holding an officer role in the given department.
    async fn officers_of(&self, department: DepartmentId)
        -> Result<Vec<UserId>, DirectoryError>;

    /// Active super administrators.
    async fn super_admins(&self) -> Result<Vec<UserId>, DirectoryError>;
}
