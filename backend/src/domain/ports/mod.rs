//! Domain ports: trait boundaries between the lifecycle engine and its
//! adapters (persistence, live connections, email).

mod macros;
pub(crate) use macros::define_port_error;

mod connection_registry;
mod department_repository;
mod directory;
mod grievance_store;
mod mailer;
mod notification_repository;
mod user_admin;

#[cfg(test)]
pub use connection_registry::MockConnectionRegistry;
pub use connection_registry::{ConnectionId, ConnectionRegistry, PushEvent, PushSender};
#[cfg(test)]
pub use department_repository::MockDepartmentRepository;
pub use department_repository::{DepartmentRepository, DepartmentRepositoryError};
#[cfg(test)]
pub use directory::MockRoleDirectory;
pub use directory::{Credentials, DirectoryError, RoleDirectory};
#[cfg(test)]
pub use grievance_store::MockGrievanceStore;
pub use grievance_store::{GrievanceStore, GrievanceStoreError, NewGrievance};
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{EmailMessage, Mailer, MailerError};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use user_admin::MockUserAdministration;
pub use user_admin::{UserAccount, UserAdminError, UserAdministration};
