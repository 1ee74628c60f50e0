//! Access control evaluation.
//!
//! Authorization is decided fresh per request: a [`Capabilities`] value is
//! resolved once from the caller's current role assignments (a database
//! read, never the login-time token snapshot) and then answers every check
//! for that request without further scanning.

use std::collections::BTreeSet;

use super::department::DepartmentId;
use super::grievance::AssignedGrievance;
use super::user::{RoleAssignment, UserId};

/// What a caller may do with a particular grievance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Access {
    /// May fetch the grievance and its history.
    pub read: bool,
    /// May append comments to the ledger.
    pub comment: bool,
    /// May change the grievance status.
    pub manage: bool,
}

impl Access {
    const NONE: Self = Self {
        read: false,
        comment: false,
        manage: false,
    };

    const OWNER: Self = Self {
        read: true,
        comment: true,
        manage: false,
    };

    const OFFICER: Self = Self {
        read: true,
        comment: true,
        manage: true,
    };
}

/// Precomputed capability set for one caller, valid for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    user_id: UserId,
    is_super_admin: bool,
    officer_departments: BTreeSet<DepartmentId>,
}

impl Capabilities {
    /// Fold the caller's role assignments into a capability set.
    pub fn resolve(user_id: UserId, assignments: &[RoleAssignment]) -> Self {
        let mut is_super_admin = false;
        let mut officer_departments = BTreeSet::new();
        for assignment in assignments {
            match (assignment.role.is_officer(), assignment.department) {
                (true, Some(dept)) => {
                    officer_departments.insert(dept);
                }
                _ => {
                    if assignment.role == super::user::Role::SuperAdmin {
                        is_super_admin = true;
                    }
                }
            }
        }
        Self {
            user_id,
            is_super_admin,
            officer_departments,
        }
    }

    /// The caller this capability set belongs to.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Whether the caller holds the global administrator role.
    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    /// Whether the caller has any officer-level standing at all.
    pub fn is_officer(&self) -> bool {
        self.is_super_admin || !self.officer_departments.is_empty()
    }

    /// Departments the caller holds an officer role in.
    pub fn officer_departments(&self) -> impl Iterator<Item = DepartmentId> + '_ {
        self.officer_departments.iter().copied()
    }

    /// Whether the caller manages grievances assigned to `department`.
    pub fn manages_department(&self, department: DepartmentId) -> bool {
        self.is_super_admin || self.officer_departments.contains(&department)
    }

    /// Evaluate access to one grievance.
    ///
    /// Owners read and comment but never manage; officers of the assigned
    /// department and super admins get everything; everyone else, nothing.
    pub fn access_to(&self, grievance: &AssignedGrievance) -> Access {
        if self.manages_department(grievance.department) {
            return Access::OFFICER;
        }
        if grievance.grievance.submitted_by == self.user_id {
            return Access::OWNER;
        }
        Access::NONE
    }
}
