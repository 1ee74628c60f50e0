//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand to match.

diesel::table! {
    /// Registered portal users.
    ///
    /// Deactivation flips `is_active` instead of deleting, so grievance
    /// history keeps resolving its authors.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Full display name.
        full_name -> Varchar,
        /// Login email, unique across the table.
        email -> Varchar,
        /// Argon2 password hash string.
        password_hash -> Varchar,
        /// Soft-delete flag; inactive users are refused on every request.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Departments, seeded by migration and treated as immutable.
    departments (id) {
        /// Small stable integer key matching the seed order.
        id -> Int4,
        /// Department display name, unique.
        name -> Varchar,
    }
}

diesel::table! {
    /// Role assignments: one row per (user, role, department) grant.
    ///
    /// `department_id` is null for the global roles. A partial unique index
    /// prevents duplicate grants.
    user_department_roles (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// User holding the role.
        user_id -> Uuid,
        /// Role label (`student`, `nodal_officer`, `department_head`,
        /// `super_admin`).
        role -> Varchar,
        /// Department scope; null for global roles.
        department_id -> Nullable<Int4>,
        /// Grant timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Grievance records.
    grievances (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// External human-readable ticket identifier, unique.
        ticket_id -> Varchar,
        /// Short title.
        title -> Varchar,
        /// Full description text.
        description -> Text,
        /// Category label the grievance was filed under.
        category -> Varchar,
        /// Current lifecycle status label.
        status -> Varchar,
        /// Submitting user.
        submitted_by -> Uuid,
        /// Submission timestamp.
        created_at -> Timestamptz,
        /// Timestamp of the latest status change or comment.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Active department assignment, one row per grievance.
    ///
    /// Kept in its own relation so re-routing never rewrites the grievance
    /// record itself.
    grievance_assignments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Assigned grievance, unique.
        grievance_id -> Uuid,
        /// Owning department.
        department_id -> Int4,
        /// Assignment timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only grievance history: comments and status changes.
    ///
    /// Rows are never updated or deleted.
    grievance_updates (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Sequence-assigned insertion counter. `now()` is fixed per
        /// transaction, so entries written together share a timestamp; this
        /// column breaks the tie.
        seq -> Int8,
        /// Grievance the entry belongs to.
        grievance_id -> Uuid,
        /// Entry author.
        author_id -> Uuid,
        /// Role label the author held at write time.
        author_role -> Varchar,
        /// Entry kind label (`comment` or `status_change`).
        kind -> Varchar,
        /// Entry text.
        body -> Text,
        /// Entry timestamp; history is ordered by this, then by `seq`.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// File attachment metadata, immutable after creation.
    attachments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Grievance the file belongs to.
        grievance_id -> Uuid,
        /// Original upload file name.
        file_name -> Varchar,
        /// Storage path of the stored blob.
        stored_path -> Varchar,
        /// MIME type recorded at upload.
        mime_type -> Varchar,
        /// Upload timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-recipient notifications; only `is_read` is ever mutated.
    notifications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Recipient.
        user_id -> Uuid,
        /// Rendered notification text.
        message -> Text,
        /// Deep link into the portal.
        link -> Varchar,
        /// Read flag.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_department_roles -> users (user_id));
diesel::joinable!(user_department_roles -> departments (department_id));
diesel::joinable!(grievances -> users (submitted_by));
diesel::joinable!(grievance_assignments -> grievances (grievance_id));
diesel::joinable!(grievance_assignments -> departments (department_id));
diesel::joinable!(grievance_updates -> grievances (grievance_id));
diesel::joinable!(attachments -> grievances (grievance_id));
diesel::joinable!(notifications -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    departments,
    user_department_roles,
    grievances,
    grievance_assignments,
    grievance_updates,
    attachments,
    notifications,
);
