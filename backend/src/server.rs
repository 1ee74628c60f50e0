//! Server construction: adapter wiring and application assembly.
//!
//! Builds the Diesel adapters over one shared pool, assembles the domain
//! services behind their ports, and mounts the REST scope, the WebSocket
//! entry point, and (in debug builds) Swagger UI.

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::domain::ports::{ConnectionRegistry, Mailer, RoleDirectory};
use crate::domain::services::{
    AdminService, AuthService, DepartmentService, GrievanceService, NotificationDispatcher,
    NotificationService,
};
use crate::domain::Error;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::auth::TokenCodec;
use crate::inbound::http::HttpState;
use crate::inbound::ws::WsState;
use crate::inbound::{http, ws};
use crate::middleware::trace::Trace;
use crate::outbound::mailer::LogOnlyMailer;
use crate::outbound::persistence::{
    DbPool, DieselDepartmentRepository, DieselGrievanceStore, DieselNotificationRepository,
    DieselRoleDirectory, DieselUserAdmin,
};
use crate::outbound::registry::InProcessConnectionRegistry;

/// Wire the production adapters and services into the shared handler state.
pub fn build_states(pool: &DbPool, config: &AppConfig) -> Result<(HttpState, WsState), Error> {
    let tokens = TokenCodec::new(
        &config.token_secret,
        chrono::Duration::hours(config.token_ttl_hours),
    )?;

    let directory: Arc<dyn RoleDirectory> = Arc::new(DieselRoleDirectory::new(pool.clone()));
    let registry: Arc<dyn ConnectionRegistry> = Arc::new(InProcessConnectionRegistry::new());
    let mailer: Arc<dyn Mailer> = Arc::new(LogOnlyMailer::new());
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(DieselNotificationRepository::new(pool.clone())),
        directory.clone(),
        registry.clone(),
        mailer,
    ));

    let auth = Arc::new(AuthService::new(directory.clone()));
    let http_state = HttpState {
        auth: auth.clone(),
        grievances: Arc::new(GrievanceService::new(
            Arc::new(DieselGrievanceStore::new(pool.clone())),
            directory.clone(),
            dispatcher,
        )),
        notifications: Arc::new(NotificationService::new(
            Arc::new(DieselNotificationRepository::new(pool.clone())),
            directory.clone(),
        )),
        departments: Arc::new(DepartmentService::new(Arc::new(
            DieselDepartmentRepository::new(pool.clone()),
        ))),
        admin: Arc::new(AdminService::new(
            Arc::new(DieselUserAdmin::new(pool.clone())),
            directory,
        )),
        tokens: tokens.clone(),
    };
    let ws_state = WsState {
        registry,
        auth,
        tokens,
    };

    Ok((http_state, ws_state))
}

/// Build and bind the HTTP server.
pub fn run(http_state: HttpState, ws_state: WsState, config: &AppConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let ws_state = web::Data::new(ws_state);

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(http_state.clone())
            .app_data(ws_state.clone())
            .wrap(Trace)
            .configure(http::configure)
            .service(ws::entry);

        #[cfg(debug_assertions)]
        let app = app
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr)?;

    Ok(server.run())
}
