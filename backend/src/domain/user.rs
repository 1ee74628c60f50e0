//! Users, roles, and role assignments.
//!
//! Roles are a set, not a single column: the same person can be a nodal
//! officer for one department while remaining a plain student elsewhere.
//! `super_admin` and `student` are global and carry no department.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::department::DepartmentId;

/// Unique user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Role a user can hold, possibly scoped to a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Default role every registered user holds implicitly.
    Student,
    /// First-line department staff acting on assigned grievances.
    NodalOfficer,
    /// Elevated officer role with the same grievance scope as nodal officers.
    DepartmentHead,
    /// Global administrator.
    SuperAdmin,
}

impl Role {
    /// Whether the role grants officer-level standing within a department.
    pub fn is_officer(self) -> bool {
        matches!(self, Self::NodalOfficer | Self::DepartmentHead)
    }

    /// Stable label stored in the database and in ledger snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::NodalOfficer => "nodal_officer",
            Self::DepartmentHead => "department_head",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role label: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "nodal_officer" => Ok(Self::NodalOfficer),
            "department_head" => Ok(Self::DepartmentHead),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// One (role, department) pair held by a user.
///
/// `department` is `None` for the global roles (`student`, `super_admin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub role: Role,
    pub department: Option<DepartmentId>,
}

impl RoleAssignment {
    /// Global assignment without a department scope.
    pub fn global(role: Role) -> Self {
        Self {
            role,
            department: None,
        }
    }

    /// Department-scoped assignment.
    pub fn scoped(role: Role, department: DepartmentId) -> Self {
        Self {
            role,
            department: Some(department),
        }
    }

    /// Pick the role a user acts under when touching a grievance assigned to
    /// `department`, for snapshotting into the ledger. Department-scoped
    /// officer roles in that department win (head over nodal officer), then
    /// the global administrator role, then plain student.
    pub fn acting_role(assignments: &[Self], department: DepartmentId) -> Role {
        let in_department = |role: Role| {
            assignments
                .iter()
                .any(|a| a.role == role && a.department == Some(department))
        };
        if in_department(Role::DepartmentHead) {
            Role::DepartmentHead
        } else if in_department(Role::NodalOfficer) {
            Role::NodalOfficer
        } else if assignments.iter().any(|a| a.role == Role::SuperAdmin) {
            Role::SuperAdmin
        } else {
            Role::Student
        }
    }
}

/// Domain user identity.
///
/// Deactivation is a soft delete: the record and its history survive but all
/// future actions are refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
}
