//! HTTP inbound adapter exposing the portal's REST endpoints.

pub mod admin;
pub mod auth;
pub mod departments;
pub mod error;
pub mod grievances;
pub mod notifications;
pub mod officer;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;
pub use state::HttpState;

/// Register every REST endpoint under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(users::login)
            .service(users::me)
            .service(grievances::submit)
            .service(grievances::mine)
            .service(grievances::fetch)
            .service(grievances::comment)
            .service(grievances::update_status)
            .service(officer::queue)
            .service(departments::list)
            .service(notifications::recent)
            .service(notifications::mark_all_read)
            .service(notifications::mark_read)
            .service(admin::list_users)
            .service(admin::deactivate)
            .service(admin::reactivate)
            .service(admin::assign_role),
    );
}
