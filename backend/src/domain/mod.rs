//! Domain layer: grievance lifecycle rules, access control, notification
//! fan-out, and the ports the adapters implement.

pub mod access;
pub mod department;
pub mod dispatch;
pub mod error;
pub mod grievance;
pub mod ledger;
pub mod notification;
pub mod ports;
pub mod services;
pub mod transition;
pub mod user;

pub use access::{Access, Capabilities};
pub use department::{Category, Department, DepartmentId};
pub use error::{Error, ErrorCode};
pub use grievance::{
    AssignedGrievance, Attachment, Grievance, GrievanceId, GrievanceStatus, StatusCounts, TicketId,
};
pub use ledger::{GrievanceUpdate, LedgerEntryDraft, UpdateKind};
pub use notification::{NewNotification, Notification};
pub use user::{Role, RoleAssignment, User, UserId};
