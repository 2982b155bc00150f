//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::entities::Notification;
use inbox_core::traits::{NotificationRepository, RepoResult};
use inbox_core::value_objects::{MessageId, NotificationId, UserId};

use crate::models::NotificationModel;

use super::error::{map_db_error, notification_not_found};

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: NotificationId) -> RepoResult<Option<Notification>> {
        let result = sqlx::query_as::<_, NotificationModel>(
            "SELECT id, user_id, message_id, timestamp, read FROM notifications WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Notification::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> RepoResult<Vec<Notification>> {
        let results = sqlx::query_as::<_, NotificationModel>(
            r"
            SELECT id, user_id, message_id, timestamp, read
            FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR read = FALSE)
            ORDER BY timestamp DESC, id DESC
            ",
        )
        .bind(user_id.into_inner())
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Notification::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: MessageId) -> RepoResult<Vec<Notification>> {
        let results = sqlx::query_as::<_, NotificationModel>(
            r"
            SELECT id, user_id, message_id, timestamp, read
            FROM notifications
            WHERE message_id = $1
            ORDER BY timestamp ASC
            ",
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Notification::from).collect())
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: NotificationId) -> RepoResult<()> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(notification_not_found(id));
        }

        Ok(())
    }
}
