//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.
//!
//! Rows are the durable half of the notification fan-out; live pushes layer
//! on top. Read-state updates always filter by owner, so marking a foreign
//! notification read is a silent no-op rather than an error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{NewNotification, Notification, UserId};

use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain notification repository errors.
fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            NotificationRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain notification repository errors.
fn map_diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
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
            NotificationRepositoryError::connection("database connection error")
        }
        _ => NotificationRepositoryError::query("database error"),
    }
}

/// Convert a database row to a domain notification.
fn row_to_notification(row: NotificationRow) -> Notification {
    Notification {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        message: row.message,
        link: row.link,
        is_read: row.is_read,
        created_at: row.created_at,
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert_all(
        &self,
        notifications: &[NewNotification],
    ) -> Result<(), NotificationRepositoryError> {
        if notifications.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewNotificationRow<'_>> = notifications
            .iter()
            .map(|notification| NewNotificationRow {
                id: Uuid::new_v4(),
                user_id: notification.user_id.as_uuid(),
                message: &notification.message,
                link: &notification.link,
            })
            .collect();

        diesel::insert_into(notifications::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn recent_for(
        &self,
        user: UserId,
        limit: i64,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::user_id.eq(user.as_uuid()))
            .order(notifications::created_at.desc())
            .limit(limit)
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_notification).collect())
    }

    async fn mark_all_read(&self, user: UserId) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user.as_uuid()))
                .filter(notifications::is_read.eq(false)),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn mark_read(&self, id: Uuid, user: UserId) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(
            notifications::table
                .find(id)
                .filter(notifications::user_id.eq(user.as_uuid())),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(())
    }
}
