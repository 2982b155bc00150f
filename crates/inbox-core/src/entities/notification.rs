//! Notification entity - tells a receiver about a new message

use chrono::{DateTime, Utc};

use super::message::Message;
use crate::value_objects::{MessageId, NotificationId, UserId};

/// Notification entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message_id: MessageId,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    /// Build the notification owed to the receiver of `message`
    pub fn for_message(message: &Message) -> Self {
        Self {
            id: NotificationId::new(),
            user_id: message.receiver_id,
            message_id: message.id,
            timestamp: Utc::now(),
            read: false,
        }
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
