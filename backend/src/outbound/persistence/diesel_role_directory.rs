//! PostgreSQL-backed `RoleDirectory` implementation using Diesel ORM.
//!
//! The directory is read on every gated request, so queries here stay narrow:
//! user lookup by primary key, role sets by user, and recipient scans for the
//! notification fan-out. Only the login path ever selects the password hash.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{Credentials, DirectoryError, RoleDirectory};
use crate::domain::{DepartmentId, Role, RoleAssignment, User, UserId};

use super::models::{CredentialsRow, RoleRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_department_roles, users};

/// Diesel-backed implementation of the `RoleDirectory` port.
#[derive(Clone)]
pub struct DieselRoleDirectory {
    pool: DbPool,
}

impl DieselRoleDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain directory errors.
fn map_pool_error(error: PoolError) -> DirectoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DirectoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain directory errors.
fn map_diesel_error(error: diesel::result::Error) -> DirectoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DirectoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => DirectoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DirectoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => DirectoryError::query("database error"),
        _ => DirectoryError::query("database error"),
    }
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> User {
    User {
        id: UserId::from_uuid(row.id),
        full_name: row.full_name,
        email: row.email,
        is_active: row.is_active,
    }
}

/// Convert a role row to a domain assignment.
fn row_to_assignment(row: RoleRow) -> Result<RoleAssignment, DirectoryError> {
    let role = row
        .role
        .parse::<Role>()
        .map_err(|err| DirectoryError::query(format!("corrupted role label in database: {err}")))?;
    Ok(RoleAssignment {
        role,
        department: row.department_id.map(DepartmentId),
    })
}

#[async_trait]
impl RoleDirectory for DieselRoleDirectory {
    async fn find_user(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_user))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CredentialsRow> = users::table
            .filter(users::email.eq(email))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|row| Credentials {
            user: User {
                id: UserId::from_uuid(row.id),
                full_name: row.full_name,
                email: row.email,
                is_active: row.is_active,
            },
            password_hash: row.password_hash,
        }))
    }

    async fn roles_for(&self, id: UserId) -> Result<Vec<RoleAssignment>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RoleRow> = user_department_roles::table
            .filter(user_department_roles::user_id.eq(id.as_uuid()))
            .order(user_department_roles::created_at.asc())
            .select(RoleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_assignment).collect()
    }

    async fn officers_of(
        &self,
        department: DepartmentId,
    ) -> Result<Vec<UserId>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let officer_roles = [Role::NodalOfficer.as_str(), Role::DepartmentHead.as_str()];
        let ids: Vec<uuid::Uuid> = user_department_roles::table
            .inner_join(users::table)
            .filter(user_department_roles::role.eq_any(officer_roles))
            .filter(user_department_roles::department_id.eq(department.0))
            .filter(users::is_active)
            .select(user_department_roles::user_id)
            .distinct()
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn super_admins(&self) -> Result<Vec<UserId>, DirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<uuid::Uuid> = user_department_roles::table
            .inner_join(users::table)
            .filter(user_department_roles::role.eq(Role::SuperAdmin.as_str()))
            .filter(users::is_active)
            .select(user_department_roles::user_id)
            .distinct()
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_rows_map_department_scope() {
        let scoped = RoleRow {
            user_id: uuid::Uuid::new_v4(),
            role: "nodal_officer".to_owned(),
            department_id: Some(3),
        };
        assert_eq!(
            row_to_assignment(scoped).expect("known role"),
            RoleAssignment::scoped(Role::NodalOfficer, DepartmentId(3))
        );

        let global = RoleRow {
            user_id: uuid::Uuid::new_v4(),
            role: "super_admin".to_owned(),
            department_id: None,
        };
        assert_eq!(
            row_to_assignment(global).expect("known role"),
            RoleAssignment::global(Role::SuperAdmin)
        );
    }

    #[test]
    fn corrupted_role_labels_are_query_errors() {
        let row = RoleRow {
            user_id: uuid::Uuid::new_v4(),
            role: "registrar".to_owned(),
            department_id: None,
        };
        let err = row_to_assignment(row).expect_err("unknown role must not load");
        assert!(matches!(err, DirectoryError::Query { .. }));
    }
}
