//! Domain services: the use-case layer driving the ports.
//!
//! Every gated operation resolves the caller's [`Capabilities`] from a fresh
//! directory read, so role grants and deactivation take effect on the very
//! next request rather than at token expiry.

mod admin;
mod auth;
mod departments;
mod grievances;
mod notifications;
mod notifier;

pub use admin::AdminService;
pub use auth::{AuthService, AuthenticatedUser};
pub use departments::DepartmentService;
pub use grievances::{
    GrievanceDetail, GrievanceService, NewGrievanceRequest, OfficerDashboard, TransitionOutcome,
};
pub use notifications::NotificationService;
pub use notifier::NotificationDispatcher;

use crate::domain::access::Capabilities;
use crate::domain::error::Error;
use crate::domain::ports::{DirectoryError, RoleDirectory};
use crate::domain::user::{RoleAssignment, UserId};

pub(crate) fn map_directory_error(error: DirectoryError) -> Error {
    match error {
        DirectoryError::Connection { message } => {
            Error::service_unavailable(format!("directory unavailable: {message}"))
        }
        DirectoryError::Query { message } => {
            Error::internal(format!("directory error: {message}"))
        }
    }
}

/// The caller's current standing: capability set plus the raw assignments
/// (kept for ledger role snapshots).
pub(crate) struct Caller {
    pub capabilities: Capabilities,
    pub assignments: Vec<RoleAssignment>,
}

/// Load and verify the caller, refusing unknown or deactivated accounts.
pub(crate) async fn resolve_caller<R>(directory: &R, id: UserId) -> Result<Caller, Error>
where
    R: RoleDirectory + ?Sized,
{
    let user = directory
        .find_user(id)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::unauthorized("unknown user"))?;
    if !user.is_active {
        return Err(Error::unauthorized("account is deactivated"));
    }
    let assignments = directory.roles_for(id).await.map_err(map_directory_error)?;
    Ok(Caller {
        capabilities: Capabilities::resolve(id, &assignments),
        assignments,
    })
}
