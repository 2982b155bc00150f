//! PostgreSQL implementation of the transactional store
//!
//! Each [`PgStoreTx`] owns one `sqlx::Transaction`. Dropping it without
//! calling `commit` rolls the transaction back.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use inbox_core::entities::{Message, MessageHistory, Notification};
use inbox_core::traits::{MessagingStore, RepoResult, StoreTx};
use inbox_core::value_objects::{MessageId, UserId};

use crate::models::MessageModel;

use super::error::{map_db_error, message_not_found};

/// Opens PostgreSQL write transactions
#[derive(Clone)]
pub struct PgMessagingStore {
    pool: PgPool,
}

impl PgMessagingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessagingStore for PgMessagingStore {
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgStoreTx { tx }))
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

/// An open PostgreSQL transaction
pub struct PgStoreTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgStoreTx {
    #[instrument(skip(self))]
    async fn find_message(&mut self, id: MessageId) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, sender_id, receiver_id, content, timestamp, read, edited, edited_by, parent_message_id
            FROM messages
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn insert_message(&mut self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO messages
                (id, sender_id, receiver_id, content, timestamp, read, edited, edited_by, parent_message_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(message.receiver_id.into_inner())
        .bind(&message.content)
        .bind(message.timestamp)
        .bind(message.read)
        .bind(message.edited)
        .bind(message.edited_by.map(UserId::into_inner))
        .bind(message.parent_message_id.map(MessageId::into_inner))
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn update_message(&mut self, message: &Message) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE messages
            SET content = $2, read = $3, edited = $4, edited_by = $5
            WHERE id = $1
            ",
        )
        .bind(message.id.into_inner())
        .bind(&message.content)
        .bind(message.read)
        .bind(message.edited)
        .bind(message.edited_by.map(UserId::into_inner))
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(message.id));
        }

        Ok(())
    }

    #[instrument(skip(self, history), fields(message_id = %history.message_id))]
    async fn insert_history(&mut self, history: &MessageHistory) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO message_history (id, message_id, old_content, edited_by, edited_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(history.id.into_inner())
        .bind(history.message_id.into_inner())
        .bind(&history.old_content)
        .bind(history.edited_by.map(UserId::into_inner))
        .bind(history.edited_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, notification), fields(message_id = %notification.message_id))]
    async fn insert_notification(&mut self, notification: &Notification) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO notifications (id, user_id, message_id, timestamp, read)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(notification.id.into_inner())
        .bind(notification.user_id.into_inner())
        .bind(notification.message_id.into_inner())
        .bind(notification.timestamp)
        .bind(notification.read)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_user(&mut self, id: UserId) -> RepoResult<bool> {
        // Foreign keys cascade to messages, history and notifications
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_notifications_for_user(&mut self, user_id: UserId) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_notifications_for_received(&mut self, user_id: UserId) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM notifications
            WHERE message_id IN (SELECT id FROM messages WHERE receiver_id = $1)
            ",
        )
        .bind(user_id.into_inner())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_history_by_editor(&mut self, user_id: UserId) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM message_history WHERE edited_by = $1")
            .bind(user_id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)?;
        debug!("Transaction committed");
        Ok(())
    }
}
