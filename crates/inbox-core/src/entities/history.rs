//! Message history - append-only snapshots of replaced content

use chrono::{DateTime, Utc};

use super::message::Message;
use crate::value_objects::{HistoryId, MessageId, UserId};

/// A prior version of a message's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHistory {
    pub id: HistoryId,
    pub message_id: MessageId,
    pub old_content: String,
    pub edited_by: Option<UserId>,
    pub edited_at: DateTime<Utc>,
}

impl MessageHistory {
    /// Snapshot the committed content of `message` before it is replaced
    pub fn record(committed: &Message, edited_by: UserId) -> Self {
        Self {
            id: HistoryId::new(),
            message_id: committed.id,
            old_content: committed.content.clone(),
            edited_by: Some(edited_by),
            edited_at: Utc::now(),
        }
    }
}
