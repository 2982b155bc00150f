//! Repository traits (ports) - define the read-side interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Writes that trigger lifecycle hooks go
//! through [`crate::traits::MessagingStore`] instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Message, MessageHistory, Notification, UnreadMessage, User};
use crate::error::DomainError;
use crate::value_objects::{MessageId, NotificationId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Pagination options for conversation queries
#[derive(Debug, Clone, Default)]
pub struct ConversationQuery {
    /// Only messages strictly older than this instant
    pub before: Option<DateTime<Utc>>,
    /// Id of the last message already seen at `before`; makes the cursor
    /// `(timestamp, id)` so rows sharing that timestamp are not skipped
    pub before_id: Option<MessageId>,
    pub limit: i64,
}

impl ConversationQuery {
    /// Whether `message` lies strictly before the cursor
    pub fn admits(&self, message: &Message) -> bool {
        match (self.before, self.before_id) {
            (None, _) => true,
            (Some(before), None) => message.timestamp < before,
            (Some(before), Some(id)) => (message.timestamp, message.id) < (before, id),
        }
    }
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>>;

    /// Direct replies to a message, oldest first
    async fn find_replies(&self, parent_id: MessageId) -> RepoResult<Vec<Message>>;

    /// Every message the user sent or received, newest first
    async fn find_by_participant(&self, user_id: UserId) -> RepoResult<Vec<Message>>;

    /// Messages exchanged between two users, newest first
    async fn find_conversation(
        &self,
        user_id: UserId,
        other_id: UserId,
        query: ConversationQuery,
    ) -> RepoResult<Vec<Message>>;

    /// Unread messages received by the user, oldest first
    async fn find_unread_for_user(&self, user_id: UserId) -> RepoResult<Vec<UnreadMessage>>;

    /// Count unread messages received by the user
    async fn count_unread_for_user(&self, user_id: UserId) -> RepoResult<i64>;

    /// Set `read = true` if the message is still unread for `receiver_id`.
    /// Returns whether a row changed.
    async fn mark_read(&self, id: MessageId, receiver_id: UserId) -> RepoResult<bool>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find notification by ID
    async fn find_by_id(&self, id: NotificationId) -> RepoResult<Option<Notification>>;

    /// Notifications targeted at the user, newest first
    async fn find_by_user(&self, user_id: UserId, unread_only: bool)
        -> RepoResult<Vec<Notification>>;

    /// Notifications attached to a message
    async fn find_by_message(&self, message_id: MessageId) -> RepoResult<Vec<Notification>>;

    /// Mark a notification read
    async fn mark_read(&self, id: NotificationId) -> RepoResult<()>;
}

// ============================================================================
// History Repository
// ============================================================================

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// History rows of a message, newest first
    async fn find_by_message(&self, message_id: MessageId) -> RepoResult<Vec<MessageHistory>>;

    /// Number of history rows of a message
    async fn count_by_message(&self, message_id: MessageId) -> RepoResult<i64>;
}
