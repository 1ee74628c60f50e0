//! PostgreSQL-backed `GrievanceStore` implementation using Diesel ORM.
//!
//! Multi-step writes (transition plus ledger entry, comment plus auto-reopen)
//! run inside one database transaction so the ledger can never drift from the
//! grievance status. Timestamps on appended entries come from the database
//! clock, which is fixed per transaction; history reads therefore order by
//! the `seq` insertion counter after `created_at`, so entries written in one
//! transaction keep their write order. The grievance's `updated_at` is set
//! from the entry it records.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{GrievanceStore, GrievanceStoreError, NewGrievance};
use crate::domain::{
    AssignedGrievance, Attachment, DepartmentId, Grievance, GrievanceId, GrievanceStatus,
    GrievanceUpdate, LedgerEntryDraft, StatusCounts, TicketId, UserId,
};

use super::models::{
    AttachmentRow, GrievanceRow, NewAssignmentRow, NewGrievanceRow, NewUpdateRow, UpdateRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{attachments, grievance_assignments, grievance_updates, grievances};

/// Diesel-backed implementation of the `GrievanceStore` port.
#[derive(Clone)]
pub struct DieselGrievanceStore {
    pool: DbPool,
}

impl DieselGrievanceStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain grievance store errors.
fn map_pool_error(error: PoolError) -> GrievanceStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            GrievanceStoreError::connection(message)
        }
    }
}

/// Whether the error is a unique-constraint violation.
fn is_unique_violation(error: &diesel::result::Error) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Map Diesel errors to domain grievance store errors.
fn map_diesel_error(error: diesel::result::Error) -> GrievanceStoreError {
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
        DieselError::NotFound => GrievanceStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => GrievanceStoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            GrievanceStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => GrievanceStoreError::query("database error"),
        _ => GrievanceStoreError::query("database error"),
    }
}

/// Convert a database row to a domain grievance.
fn row_to_grievance(row: GrievanceRow) -> Result<Grievance, GrievanceStoreError> {
    let status = row.status.parse::<GrievanceStatus>().map_err(|err| {
        GrievanceStoreError::query(format!("corrupted status label in database: {err}"))
    })?;
    let ticket_id = TicketId::parse(row.ticket_id).map_err(|err| {
        GrievanceStoreError::query(format!("corrupted ticket identifier in database: {err}"))
    })?;

    Ok(Grievance {
        id: GrievanceId::from_uuid(row.id),
        ticket_id,
        title: row.title,
        description: row.description,
        category: row.category,
        status,
        submitted_by: UserId::from_uuid(row.submitted_by),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Convert a database row to a domain ledger entry.
fn row_to_update(row: UpdateRow) -> Result<GrievanceUpdate, GrievanceStoreError> {
    let author_role = row.author_role.parse().map_err(|err| {
        GrievanceStoreError::query(format!("corrupted role label in database: {err}"))
    })?;
    let kind = row.kind.parse().map_err(|err| {
        GrievanceStoreError::query(format!("corrupted entry kind in database: {err}"))
    })?;

    Ok(GrievanceUpdate {
        id: row.id,
        grievance_id: GrievanceId::from_uuid(row.grievance_id),
        author_id: UserId::from_uuid(row.author_id),
        author_role,
        kind,
        body: row.body,
        created_at: row.created_at,
    })
}

/// Convert a database row to domain attachment metadata.
fn row_to_attachment(row: AttachmentRow) -> Attachment {
    Attachment {
        id: row.id,
        grievance_id: GrievanceId::from_uuid(row.grievance_id),
        file_name: row.file_name,
        stored_path: row.stored_path,
        mime_type: row.mime_type,
        created_at: row.created_at,
    }
}

/// Append one ledger entry inside an open transaction, letting the database
/// assign its timestamp.
async fn insert_entry(
    conn: &mut diesel_async::AsyncPgConnection,
    grievance: Uuid,
    draft: &LedgerEntryDraft,
) -> Result<UpdateRow, diesel::result::Error> {
    let row = NewUpdateRow {
        id: Uuid::new_v4(),
        grievance_id: grievance,
        author_id: draft.author_id.as_uuid(),
        author_role: draft.author_role.as_str(),
        kind: draft.kind.as_str(),
        body: &draft.body,
    };
    diesel::insert_into(grievance_updates::table)
        .values(&row)
        .returning(UpdateRow::as_returning())
        .get_result(conn)
        .await
}

#[async_trait]
impl GrievanceStore for DieselGrievanceStore {
    async fn create(&self, grievance: &NewGrievance) -> Result<Grievance, GrievanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = Uuid::new_v4();
        let row = NewGrievanceRow {
            id,
            ticket_id: grievance.ticket_id.as_str(),
            title: &grievance.title,
            description: &grievance.description,
            category: &grievance.category,
            status: GrievanceStatus::Submitted.as_str(),
            submitted_by: grievance.submitted_by.as_uuid(),
        };
        let assignment = NewAssignmentRow {
            id: Uuid::new_v4(),
            grievance_id: id,
            department_id: grievance.assigned_department.0,
        };

        let inserted: GrievanceRow = conn
            .transaction(|conn| {
                async move {
                    let inserted = diesel::insert_into(grievances::table)
                        .values(&row)
                        .returning(GrievanceRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(grievance_assignments::table)
                        .values(&assignment)
                        .execute(conn)
                        .await?;
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    GrievanceStoreError::duplicate_ticket(grievance.ticket_id.as_str())
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_grievance(inserted)
    }

    async fn find_by_ticket(
        &self,
        ticket: &TicketId,
    ) -> Result<Option<AssignedGrievance>, GrievanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<(GrievanceRow, i32)> = grievances::table
            .inner_join(grievance_assignments::table)
            .filter(grievances::ticket_id.eq(ticket.as_str()))
            .select((
                GrievanceRow::as_select(),
                grievance_assignments::department_id,
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        found
            .map(|(row, department)| {
                Ok(AssignedGrievance {
                    grievance: row_to_grievance(row)?,
                    department: DepartmentId(department),
                })
            })
            .transpose()
    }

    async fn history(
        &self,
        grievance: GrievanceId,
    ) -> Result<Vec<GrievanceUpdate>, GrievanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UpdateRow> = grievance_updates::table
            .filter(grievance_updates::grievance_id.eq(grievance.as_uuid()))
            .order((
                grievance_updates::created_at.asc(),
                grievance_updates::seq.asc(),
            ))
            .select(UpdateRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_update).collect()
    }

    async fn attachments(
        &self,
        grievance: GrievanceId,
    ) -> Result<Vec<Attachment>, GrievanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AttachmentRow> = attachments::table
            .filter(attachments::grievance_id.eq(grievance.as_uuid()))
            .order(attachments::created_at.asc())
            .select(AttachmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_attachment).collect())
    }

    async fn list_for_submitter(
        &self,
        submitter: UserId,
    ) -> Result<Vec<Grievance>, GrievanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GrievanceRow> = grievances::table
            .filter(grievances::submitted_by.eq(submitter.as_uuid()))
            .order(grievances::created_at.desc())
            .select(GrievanceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_grievance).collect()
    }

    async fn list_for_departments(
        &self,
        departments: &[DepartmentId],
    ) -> Result<Vec<Grievance>, GrievanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GrievanceRow> = if departments.is_empty() {
            grievances::table
                .order(grievances::updated_at.desc())
                .select(GrievanceRow::as_select())
                .load(&mut conn)
                .await
        } else {
            let ids: Vec<i32> = departments.iter().map(|d| d.0).collect();
            grievances::table
                .inner_join(grievance_assignments::table)
                .filter(grievance_assignments::department_id.eq_any(ids))
                .order(grievances::updated_at.desc())
                .select(GrievanceRow::as_select())
                .load(&mut conn)
                .await
        }
        .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_grievance).collect()
    }

    async fn status_counts(
        &self,
        departments: &[DepartmentId],
    ) -> Result<StatusCounts, GrievanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pairs: Vec<(String, i64)> = if departments.is_empty() {
            grievances::table
                .group_by(grievances::status)
                .select((grievances::status, count_star()))
                .load(&mut conn)
                .await
        } else {
            let ids: Vec<i32> = departments.iter().map(|d| d.0).collect();
            grievances::table
                .inner_join(grievance_assignments::table)
                .filter(grievance_assignments::department_id.eq_any(ids))
                .group_by(grievances::status)
                .select((grievances::status, count_star()))
                .load(&mut conn)
                .await
        }
        .map_err(map_diesel_error)?;

        let parsed = pairs.into_iter().filter_map(|(label, count)| {
            match label.parse::<GrievanceStatus>() {
                Ok(status) => Some((status, count)),
                Err(err) => {
                    warn!(%err, "skipping unrecognised status label in analytics");
                    None
                }
            }
        });
        Ok(StatusCounts::from_pairs(parsed))
    }

    async fn apply_transition(
        &self,
        grievance: GrievanceId,
        status: GrievanceStatus,
        entry: LedgerEntryDraft,
    ) -> Result<GrievanceUpdate, GrievanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = grievance.as_uuid();

        let recorded: UpdateRow = conn
            .transaction(|conn| {
                async move {
                    let recorded = insert_entry(conn, id, &entry).await?;
                    diesel::update(grievances::table.find(id))
                        .set((
                            grievances::status.eq(status.as_str()),
                            grievances::updated_at.eq(recorded.created_at),
                        ))
                        .execute(conn)
                        .await?;
                    Ok(recorded)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_update(recorded)
    }

    async fn append_comment(
        &self,
        grievance: GrievanceId,
        entry: LedgerEntryDraft,
        reopen: Option<LedgerEntryDraft>,
    ) -> Result<Vec<GrievanceUpdate>, GrievanceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = grievance.as_uuid();

        let recorded: Vec<UpdateRow> = conn
            .transaction(|conn| {
                async move {
                    let mut recorded = vec![insert_entry(conn, id, &entry).await?];
                    if let Some(reopen) = &reopen {
                        recorded.push(insert_entry(conn, id, reopen).await?);
                        diesel::update(grievances::table.find(id))
                            .set(grievances::status.eq(GrievanceStatus::Submitted.as_str()))
                            .execute(conn)
                            .await?;
                    }
                    let last = recorded.last().map(|row| row.created_at);
                    if let Some(touched) = last {
                        diesel::update(grievances::table.find(id))
                            .set(grievances::updated_at.eq(touched))
                            .execute(conn)
                            .await?;
                    }
                    Ok(recorded)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        recorded.into_iter().map(row_to_update).collect()
    }
}
