//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::entities::{Message, UnreadMessage};
use inbox_core::traits::{ConversationQuery, MessageRepository, RepoResult};
use inbox_core::value_objects::{MessageId, UserId};

use crate::models::{MessageModel, UnreadMessageModel};

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, sender_id, receiver_id, content, timestamp, read, edited, edited_by, parent_message_id
            FROM messages
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_replies(&self, parent_id: MessageId) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, sender_id, receiver_id, content, timestamp, read, edited, edited_by, parent_message_id
            FROM messages
            WHERE parent_message_id = $1
            ORDER BY timestamp ASC, id ASC
            ",
        )
        .bind(parent_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_participant(&self, user_id: UserId) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, sender_id, receiver_id, content, timestamp, read, edited, edited_by, parent_message_id
            FROM messages
            WHERE sender_id = $1 OR receiver_id = $1
            ORDER BY timestamp DESC, id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_conversation(
        &self,
        user_id: UserId,
        other_id: UserId,
        query: ConversationQuery,
    ) -> RepoResult<Vec<Message>> {
        let limit = query.limit.clamp(1, 100);

        let results = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, sender_id, receiver_id, content, timestamp, read, edited, edited_by, parent_message_id
            FROM messages
            WHERE ((sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1))
              AND (
                $3::timestamptz IS NULL
                OR ($4::uuid IS NULL AND timestamp < $3)
                OR ($4::uuid IS NOT NULL AND (timestamp, id) < ($3, $4))
              )
            ORDER BY timestamp DESC, id DESC
            LIMIT $5
            ",
        )
        .bind(user_id.into_inner())
        .bind(other_id.into_inner())
        .bind(query.before)
        .bind(query.before_id.map(MessageId::into_inner))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_unread_for_user(&self, user_id: UserId) -> RepoResult<Vec<UnreadMessage>> {
        // Served by idx_messages_unread
        let results = sqlx::query_as::<_, UnreadMessageModel>(
            r"
            SELECT id, content, sender_id, timestamp
            FROM messages
            WHERE receiver_id = $1 AND read = FALSE
            ORDER BY timestamp ASC, id ASC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(UnreadMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_unread_for_user(&self, user_id: UserId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND read = FALSE",
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: MessageId, receiver_id: UserId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE messages
            SET read = TRUE
            WHERE id = $1 AND receiver_id = $2 AND read = FALSE
            ",
        )
        .bind(id.into_inner())
        .bind(receiver_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
