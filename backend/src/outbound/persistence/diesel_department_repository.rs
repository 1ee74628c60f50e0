//! PostgreSQL-backed `DepartmentRepository` implementation using Diesel ORM.
//!
//! Departments are migration-seeded reference data; the only operation is
//! the ordered listing that backs the submission form dropdown.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{DepartmentRepository, DepartmentRepositoryError};
use crate::domain::{Department, DepartmentId};

use super::models::DepartmentRow;
use super::pool::{DbPool, PoolError};
use super::schema::departments;

/// Diesel-backed implementation of the `DepartmentRepository` port.
#[derive(Clone)]
pub struct DieselDepartmentRepository {
    pool: DbPool,
}

impl DieselDepartmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain department repository errors.
fn map_pool_error(error: PoolError) -> DepartmentRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DepartmentRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain department repository errors.
fn map_diesel_error(error: diesel::result::Error) -> DepartmentRepositoryError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DepartmentRepositoryError::connection("database connection error")
        }
        _ => DepartmentRepositoryError::query("database error"),
    }
}

#[async_trait]
impl DepartmentRepository for DieselDepartmentRepository {
    async fn list(&self) -> Result<Vec<Department>, DepartmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DepartmentRow> = departments::table
            .order(departments::name.asc())
            .select(DepartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| Department {
                id: DepartmentId(row.id),
                name: row.name,
            })
            .collect())
    }
}
