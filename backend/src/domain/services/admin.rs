//! Super-admin user administration.

use std::sync::Arc;

use crate::domain::department::DepartmentId;
use crate::domain::error::Error;
use crate::domain::ports::{RoleDirectory, UserAccount, UserAdminError, UserAdministration};
use crate::domain::user::{Role, User, UserId};

use super::resolve_caller;

#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserAdministration>,
    directory: Arc<dyn RoleDirectory>,
}

fn map_admin_error(error: UserAdminError) -> Error {
    match error {
        UserAdminError::Connection { message } => {
            Error::service_unavailable(format!("user admin store unavailable: {message}"))
        }
        UserAdminError::Query { message } => {
            Error::internal(format!("user admin store error: {message}"))
        }
        UserAdminError::UnknownUser { id } => Error::not_found(format!("unknown user: {id}")),
        UserAdminError::DuplicateAssignment => {
            Error::conflict("the user already holds this role assignment")
        }
    }
}

impl AdminService {
    pub fn new(users: Arc<dyn UserAdministration>, directory: Arc<dyn RoleDirectory>) -> Self {
        Self { users, directory }
    }

    /// All user accounts with their role sets.
    pub async fn list_users(&self, caller: UserId) -> Result<Vec<UserAccount>, Error> {
        self.require_super_admin(caller).await?;
        self.users.list_users().await.map_err(map_admin_error)
    }

    /// Deactivate an account (soft delete). Administrators cannot lock
    /// themselves out.
    pub async fn deactivate(&self, caller: UserId, target: UserId) -> Result<User, Error> {
        self.require_super_admin(caller).await?;
        if caller == target {
            return Err(Error::invalid_request(
                "administrators cannot deactivate their own account",
            ));
        }
        self.users
            .set_active(target, false)
            .await
            .map_err(map_admin_error)
    }

    /// Reactivate a previously deactivated account.
    pub async fn reactivate(&self, caller: UserId, target: UserId) -> Result<User, Error> {
        self.require_super_admin(caller).await?;
        self.users
            .set_active(target, true)
            .await
            .map_err(map_admin_error)
    }

    /// Grant a role, optionally scoped to a department. Officer roles
    /// require a department; global roles refuse one.
    pub async fn assign_role(
        &self,
        caller: UserId,
        target: UserId,
        role: Role,
        department: Option<DepartmentId>,
    ) -> Result<(), Error> {
        self.require_super_admin(caller).await?;
        match (role.is_officer(), department) {
            (true, None) => {
                return Err(Error::invalid_request(format!(
                    "role {} requires a department",
                    role.as_str()
                )));
            }
            (false, Some(_)) => {
                return Err(Error::invalid_request(format!(
                    "role {} does not take a department",
                    role.as_str()
                )));
            }
            _ => {}
        }
        self.users
            .assign_role(target, role, department)
            .await
            .map_err(map_admin_error)
    }

    async fn require_super_admin(&self, caller: UserId) -> Result<(), Error> {
        let caller = resolve_caller(self.directory.as_ref(), caller).await?;
        if caller.capabilities.is_super_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("administrator role required"))
        }
    }
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
