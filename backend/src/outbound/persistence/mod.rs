//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain persistence ports, backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and `bb8`
//! connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: implementations only translate between Diesel rows
//!   and domain types; lifecycle and access logic stays in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) are implementation details, never exposed upward.
//! - **Strongly typed errors**: every database failure is mapped to the
//!   owning port's error type.

mod diesel_department_repository;
mod diesel_grievance_store;
mod diesel_notification_repository;
mod diesel_role_directory;
mod diesel_user_admin;
mod models;
mod pool;
mod schema;

pub use diesel_department_repository::DieselDepartmentRepository;
pub use diesel_grievance_store::DieselGrievanceStore;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_role_directory::DieselRoleDirectory;
pub use diesel_user_admin::DieselUserAdmin;
pub use pool::{DbPool, PoolConfig, PoolError};
