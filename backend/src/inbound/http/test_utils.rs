//! Shared fixtures for HTTP handler tests.

use std::sync::Arc;

use actix_web::web;
use chrono::{Duration, Utc};

use crate::domain::ports::{
    MockConnectionRegistry, MockDepartmentRepository, MockGrievanceStore, MockMailer,
    MockNotificationRepository, MockRoleDirectory, MockUserAdministration,
};
use crate::domain::services::{
    AdminService, AuthService, DepartmentService, GrievanceService, NotificationDispatcher,
    NotificationService,
};
use crate::domain::UserId;
use crate::inbound::http::auth::TokenCodec;
use crate::inbound::http::state::HttpState;

const TEST_SECRET: &str = "portal-test-secret";

/// All mockable ports; arm expectations before building the state.
#[derive(Default)]
pub struct Mocks {
    pub store: MockGrievanceStore,
    pub directory: MockRoleDirectory,
    pub notifications: MockNotificationRepository,
    pub registry: MockConnectionRegistry,
    pub mailer: MockMailer,
    pub users: MockUserAdministration,
    pub departments: MockDepartmentRepository,
}

/// Wire the mocks into a ready-to-serve [`HttpState`].
pub fn state(mocks: Mocks) -> web::Data<HttpState> {
    let directory = Arc::new(mocks.directory);
    let notifications = Arc::new(mocks.notifications);
    let dispatcher = Arc::new(NotificationDispatcher::new(
        notifications.clone(),
        directory.clone(),
        Arc::new(mocks.registry),
        Arc::new(mocks.mailer),
    ));
    let tokens = TokenCodec::new(TEST_SECRET, Duration::hours(1)).expect("valid test secret");
    web::Data::new(HttpState {
        auth: Arc::new(AuthService::new(directory.clone())),
        grievances: Arc::new(GrievanceService::new(
            Arc::new(mocks.store),
            directory.clone(),
            dispatcher,
        )),
        notifications: Arc::new(NotificationService::new(notifications, directory.clone())),
        departments: Arc::new(DepartmentService::new(Arc::new(mocks.departments))),
        admin: Arc::new(AdminService::new(Arc::new(mocks.users), directory)),
        tokens,
    })
}

/// Mint a valid token for `user` against the test state's codec.
pub fn token_for(state: &web::Data<HttpState>, user: UserId) -> String {
    state
        .tokens
        .issue(user, Utc::now())
        .expect("token issued for test user")
}

/// Directory expectations for one active caller with the given roles.
pub fn expect_active_caller(
    directory: &mut MockRoleDirectory,
    roles: Vec<crate::domain::RoleAssignment>,
) {
    directory.expect_find_user().returning(|id| {
        Ok(Some(crate::domain::User {
            id,
            full_name: "Asha Nair".to_owned(),
            email: "asha@example.edu".to_owned(),
            is_active: true,
        }))
    });
    directory
        .expect_roles_for()
        .returning(move |_| Ok(roles.clone()));
}
