//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use inbox_core::entities::{Message, MessageHistory, Notification, UnreadMessage, User};

use super::responses::{
    CurrentUserResponse, HistoryResponse, MessageResponse, NotificationResponse,
    UnreadMessageResponse, UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content.clone(),
            timestamp: message.timestamp,
            read: message.read,
            edited: message.edited,
            edited_by: message.edited_by,
            parent_message_id: message.parent_message_id,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}

impl From<MessageHistory> for HistoryResponse {
    fn from(history: MessageHistory) -> Self {
        Self {
            id: history.id,
            message_id: history.message_id,
            old_content: history.old_content,
            edited_by: history.edited_by,
            edited_at: history.edited_at,
        }
    }
}

impl From<UnreadMessage> for UnreadMessageResponse {
    fn from(message: UnreadMessage) -> Self {
        Self {
            id: message.id,
            content: message.content,
            sender_id: message.sender_id,
            timestamp: message.timestamp,
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            message_id: notification.message_id,
            timestamp: notification.timestamp,
            read: notification.read,
        }
    }
}
