//! Message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub edited: bool,
    pub edited_by: Option<Uuid>,
    pub parent_message_id: Option<Uuid>,
}

/// Projection returned by the unread index query
#[derive(Debug, Clone, FromRow)]
pub struct UnreadMessageModel {
    pub id: Uuid,
    pub content: String,
    pub sender_id: Uuid,
    pub timestamp: DateTime<Utc>,
}
