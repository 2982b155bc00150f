//! PostgreSQL implementation of HistoryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inbox_core::entities::MessageHistory;
use inbox_core::traits::{HistoryRepository, RepoResult};
use inbox_core::value_objects::MessageId;

use crate::models::HistoryModel;

use super::error::map_db_error;

/// PostgreSQL implementation of HistoryRepository
#[derive(Clone)]
pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: MessageId) -> RepoResult<Vec<MessageHistory>> {
        let results = sqlx::query_as::<_, HistoryModel>(
            r"
            SELECT id, message_id, old_content, edited_by, edited_at
            FROM message_history
            WHERE message_id = $1
            ORDER BY edited_at DESC, id DESC
            ",
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(MessageHistory::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_message(&self, message_id: MessageId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM message_history WHERE message_id = $1")
            .bind(message_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
