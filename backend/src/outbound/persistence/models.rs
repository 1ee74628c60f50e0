//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    attachments, departments, grievance_assignments, grievance_updates, grievances, notifications,
    user_department_roles, users,
};

/// Row struct for reading users without their password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
}

/// Row struct for the login flow; the only read that touches the hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// Row struct for reading from the departments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepartmentRow {
    pub id: i32,
    pub name: String,
}

/// Row struct for reading role assignments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_department_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub user_id: Uuid,
    pub role: String,
    pub department_id: Option<i32>,
}

/// Insertable struct for granting a role.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_department_roles)]
pub(crate) struct NewRoleRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: &'a str,
    pub department_id: Option<i32>,
}

/// Row struct for reading from the grievances table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = grievances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GrievanceRow {
    pub id: Uuid,
    pub ticket_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub submitted_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new grievance records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = grievances)]
pub(crate) struct NewGrievanceRow<'a> {
    pub id: Uuid,
    pub ticket_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub status: &'a str,
    pub submitted_by: Uuid,
}

/// Insertable struct for the active department assignment.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = grievance_assignments)]
pub(crate) struct NewAssignmentRow {
    pub id: Uuid,
    pub grievance_id: Uuid,
    pub department_id: i32,
}

/// Row struct for reading ledger entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = grievance_updates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UpdateRow {
    pub id: Uuid,
    pub grievance_id: Uuid,
    pub author_id: Uuid,
    pub author_role: String,
    pub kind: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending a ledger entry. The database assigns both
/// the timestamp and the `seq` counter; entries written in one transaction
/// share the transaction clock, and `seq` keeps their write order.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = grievance_updates)]
pub(crate) struct NewUpdateRow<'a> {
    pub id: Uuid,
    pub grievance_id: Uuid,
    pub author_id: Uuid,
    pub author_role: &'a str,
    pub kind: &'a str,
    pub body: &'a str,
}

/// Row struct for reading attachment metadata.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attachments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttachmentRow {
    pub id: Uuid,
    pub grievance_id: Uuid,
    pub file_name: String,
    pub stored_path: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub link: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating notification rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: &'a str,
    pub link: &'a str,
}
