//! PostgreSQL-backed `UserAdministration` implementation using Diesel ORM.
//!
//! Super-admin operations: account listing, soft activation toggles, and
//! role grants. Duplicate grants surface as constraint violations from the
//! partial unique index rather than a racy check-then-insert.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserAccount, UserAdminError, UserAdministration};
use crate::domain::{DepartmentId, Role, RoleAssignment, User, UserId};

use super::models::{NewRoleRow, RoleRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_department_roles, users};

/// Diesel-backed implementation of the `UserAdministration` port.
#[derive(Clone)]
pub struct DieselUserAdmin {
    pool: DbPool,
}

impl DieselUserAdmin {
    /// Create a new adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user administration errors.
fn map_pool_error(error: PoolError) -> UserAdminError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserAdminError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user administration errors.
fn map_diesel_error(error: diesel::result::Error) -> UserAdminError {
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
        DieselError::NotFound => UserAdminError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserAdminError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserAdminError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => UserAdminError::query("database error"),
        _ => UserAdminError::query("database error"),
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
fn row_to_assignment(row: &RoleRow) -> Result<RoleAssignment, UserAdminError> {
    let role = row
        .role
        .parse::<Role>()
        .map_err(|err| UserAdminError::query(format!("corrupted role label in database: {err}")))?;
    Ok(RoleAssignment {
        role,
        department: row.department_id.map(DepartmentId),
    })
}

#[async_trait]
impl UserAdministration for DieselUserAdmin {
    async fn list_users(&self) -> Result<Vec<UserAccount>, UserAdminError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_rows: Vec<UserRow> = users::table
            .order(users::created_at.desc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let role_rows: Vec<RoleRow> = user_department_roles::table
            .order(user_department_roles::created_at.asc())
            .select(RoleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut roles_by_user: HashMap<Uuid, Vec<RoleAssignment>> = HashMap::new();
        for row in &role_rows {
            roles_by_user
                .entry(row.user_id)
                .or_default()
                .push(row_to_assignment(row)?);
        }

        Ok(user_rows
            .into_iter()
            .map(|row| {
                let roles = roles_by_user.remove(&row.id).unwrap_or_default();
                UserAccount {
                    user: row_to_user(row),
                    roles,
                }
            })
            .collect())
    }

    async fn set_active(&self, id: UserId, active: bool) -> Result<User, UserAdminError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<UserRow> = diesel::update(users::table.find(id.as_uuid()))
            .set(users::is_active.eq(active))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        updated
            .map(row_to_user)
            .ok_or_else(|| UserAdminError::unknown_user(id.to_string()))
    }

    async fn assign_role(
        &self,
        id: UserId,
        role: Role,
        department: Option<DepartmentId>,
    ) -> Result<(), UserAdminError> {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRoleRow {
            id: Uuid::new_v4(),
            user_id: id.as_uuid(),
            role: role.as_str(),
            department_id: department.map(|d| d.0),
        };
        diesel::insert_into(user_department_roles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    UserAdminError::duplicate_assignment()
                }
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                    UserAdminError::unknown_user(id.to_string())
                }
                other => map_diesel_error(other),
            })?;
        Ok(())
    }
}
