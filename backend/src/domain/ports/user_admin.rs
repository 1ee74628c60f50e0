//! User administration port (super-admin operations).

use async_trait::async_trait;

use crate::domain::department::DepartmentId;
use crate::domain::user::{Role, RoleAssignment, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user administration adapters.
    pub enum UserAdminError {
        /// Store connection could not be established.
        Connection { message: String } => "user admin connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user admin query failed: {message}",
        /// The target user does not exist.
        UnknownUser { id: String } => "unknown user: {id}",
        /// The (role, department) pair is already assigned to the user.
        DuplicateAssignment => "role assignment already exists",
    }
}

/// User account with its current role set, as listed for administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub roles: Vec<RoleAssignment>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdministration: Send + Sync {
    /// All users with their role sets, newest account first.
    async fn list_users(&self) -> Result<Vec<UserAccount>, UserAdminError>;

    /// Activate or deactivate a user (soft delete preserving history).
    async fn set_active(&self, id: UserId, active: bool) -> Result<User, UserAdminError>;

    /// Grant a role, optionally scoped to a department.
    ///
    /// Fails with [`UserAdminError::DuplicateAssignment`] when the exact
    /// (role, department) pair already exists for the user.
    async fn assign_role(
        &self,
        id: UserId,
        role: Role,
        department: Option<DepartmentId>,
    ) -> Result<(), UserAdminError>;
}
