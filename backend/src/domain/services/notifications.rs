//! The caller-facing notification feed.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::notification::Notification;
use crate::domain::ports::{NotificationRepository, NotificationRepositoryError, RoleDirectory};
use crate::domain::user::UserId;

use super::resolve_caller;

/// Notifications shown per fetch; older ones age out of the bell menu.
const FEED_LIMIT: i64 = 15;

#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    directory: Arc<dyn RoleDirectory>,
}

fn map_repository_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        directory: Arc<dyn RoleDirectory>,
    ) -> Self {
        Self {
            notifications,
            directory,
        }
    }

    /// The caller's most recent notifications, newest first.
    pub async fn recent(&self, caller: UserId) -> Result<Vec<Notification>, Error> {
        resolve_caller(self.directory.as_ref(), caller).await?;
        self.notifications
            .recent_for(caller, FEED_LIMIT)
            .await
            .map_err(map_repository_error)
    }

    /// Mark every unread notification as read.
    pub async fn mark_all_read(&self, caller: UserId) -> Result<(), Error> {
        resolve_caller(self.directory.as_ref(), caller).await?;
        self.notifications
            .mark_all_read(caller)
            .await
            .map_err(map_repository_error)
    }

    /// Mark one notification as read. Ownership is part of the row filter,
    /// so a foreign or unknown id is a silent no-op.
    pub async fn mark_read(&self, caller: UserId, id: Uuid) -> Result<(), Error> {
        resolve_caller(self.directory.as_ref(), caller).await?;
        self.notifications
            .mark_read(id, caller)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use mockall::predicate::eq;
    use uuid::Uuid;

    use crate::domain::error::ErrorCode;
    use crate::domain::notification::Notification;
    use crate::domain::ports::{MockNotificationRepository, MockRoleDirectory};
    use crate::domain::user::{User, UserId};

    use super::NotificationService;

    fn directory_for(caller: UserId, active: bool) -> MockRoleDirectory {
        let mut directory = MockRoleDirectory::new();
        directory
            .expect_find_user()
            .with(eq(caller))
            .returning(move |id| {
                Ok(Some(User {
                    id,
                    full_name: "Asha Nair".to_owned(),
                    email: "asha@example.edu".to_owned(),
                    is_active: active,
                }))
            });
        directory
            .expect_roles_for()
            .returning(|_| Ok(Vec::new()));
        directory
    }

    #[tokio::test]
    async fn recent_caps_the_feed_at_fifteen() {
        let caller = UserId::random();
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_recent_for()
            .with(eq(caller), eq(15))
            .return_once(move |user, _| {
                Ok(vec![Notification {
                    id: Uuid::new_v4(),
                    user_id: user,
                    message: "An officer commented on your grievance #GRM2608301234.".to_owned(),
                    link: "/grievance/GRM2608301234".to_owned(),
                    is_read: false,
                    created_at: Utc::now(),
                }])
            });

        let service =
            NotificationService::new(Arc::new(notifications), Arc::new(directory_for(caller, true)));
        let feed = service.recent(caller).await.expect("feed loads");
        assert_eq!(feed.len(), 1);
    }

    #[tokio::test]
    async fn mark_read_scopes_to_the_caller() {
        let caller = UserId::random();
        let id = Uuid::new_v4();
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_mark_read()
            .with(eq(id), eq(caller))
            .return_once(|_, _| Ok(()));

        let service =
            NotificationService::new(Arc::new(notifications), Arc::new(directory_for(caller, true)));
        service.mark_read(caller, id).await.expect("marked read");
    }

    #[tokio::test]
    async fn deactivated_callers_cannot_read_the_feed() {
        let caller = UserId::random();
        let service = NotificationService::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(directory_for(caller, false)),
        );
        let err = service.recent(caller).await.expect_err("refused");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
