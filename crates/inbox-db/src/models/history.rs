//! Message history database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for message_history table
#[derive(Debug, Clone, FromRow)]
pub struct HistoryModel {
    pub id: Uuid,
    pub message_id: Uuid,
    pub old_content: String,
    pub edited_by: Option<Uuid>,
    pub edited_at: DateTime<Utc>,
}
