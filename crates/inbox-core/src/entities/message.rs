//! Message entity - a direct message between two users

use chrono::{DateTime, Utc};

use crate::value_objects::{MessageId, UserId};

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub edited: bool,
    pub edited_by: Option<UserId>,
    pub parent_message_id: Option<MessageId>,
}

impl Message {
    /// Create a new Message
    pub fn new(sender_id: UserId, receiver_id: UserId, content: String) -> Self {
        Self {
            id: MessageId::new(),
            sender_id,
            receiver_id,
            content,
            timestamp: Utc::now(),
            read: false,
            edited: false,
            edited_by: None,
            parent_message_id: None,
        }
    }

    /// Create a reply to another message
    pub fn new_reply(
        sender_id: UserId,
        receiver_id: UserId,
        content: String,
        parent_message_id: MessageId,
    ) -> Self {
        Self {
            parent_message_id: Some(parent_message_id),
            ..Self::new(sender_id, receiver_id, content)
        }
    }

    /// Check if the user sent or received this message
    #[inline]
    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// Check if the message was exchanged between exactly these two users
    pub fn is_between(&self, a: UserId, b: UserId) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }

    /// The other side of the conversation, seen from `user_id`
    pub fn counterpart(&self, user_id: UserId) -> Option<UserId> {
        if self.sender_id == user_id {
            Some(self.receiver_id)
        } else if self.receiver_id == user_id {
            Some(self.sender_id)
        } else {
            None
        }
    }

    /// Whether `user_id` may mark this message read right now
    #[inline]
    pub fn is_unread_for(&self, user_id: UserId) -> bool {
        !self.read && self.receiver_id == user_id
    }
}

/// Minimal projection served by the unread index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadMessage {
    pub id: MessageId,
    pub content: String,
    pub sender_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl From<&Message> for UnreadMessage {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            content: message.content.clone(),
            sender_id: message.sender_id,
            timestamp: message.timestamp,
        }
    }
}
