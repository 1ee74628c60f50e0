//! Departments and grievance categories.
//!
//! Departments are immutable reference data seeded by migration; categories
//! route new grievances to the department that owns them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Department identifier (matches the seeded `departments.id` column).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct DepartmentId(pub i32);

impl std::fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named organisational unit owning a set of categories and officers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

/// Grievance category, each owned by exactly one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Academic,
    Hostel,
    Administration,
    Library,
    Accounts,
}

impl Category {
    /// Department that owns grievances filed under this category.
    ///
    /// The identifiers match the seed migration order.
    pub fn department(self) -> DepartmentId {
        match self {
            Self::Academic => DepartmentId(1),
            Self::Hostel => DepartmentId(2),
            Self::Administration => DepartmentId(3),
            Self::Library => DepartmentId(4),
            Self::Accounts => DepartmentId(5),
        }
    }

    /// Stable label stored on the grievance row.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Academic => "Academic",
            Self::Hostel => "Hostel",
            Self::Administration => "Administration",
            Self::Library => "Library",
            Self::Accounts => "Accounts",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grievance category: {0}")]
pub struct UnknownCategory(pub String);

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "academic" => Ok(Self::Academic),
            "hostel" => Ok(Self::Hostel),
            "administration" => Ok(Self::Administration),
            "library" => Ok(Self::Library),
            "accounts" => Ok(Self::Accounts),
            other => Err(UnknownCategory(other.to_owned())),
        }
    }
}
