//! Transactional store port
//!
//! Every write that carries a lifecycle side effect (notification on create,
//! history on edit, cleanup on account deletion) runs on one [`StoreTx`], so
//! the side effect commits or rolls back together with the triggering write.

use async_trait::async_trait;

use super::repositories::RepoResult;
use crate::entities::{Message, MessageHistory, Notification};
use crate::value_objects::{MessageId, UserId};

/// Opens write transactions
#[async_trait]
pub trait MessagingStore: Send + Sync {
    /// Begin a new transaction
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>>;

    /// Check that the backing storage is reachable
    async fn ping(&self) -> RepoResult<()>;
}

/// An open write transaction. Dropping it without `commit` rolls back.
#[async_trait]
pub trait StoreTx: Send {
    /// Read the last committed state of a message (as seen by this transaction)
    async fn find_message(&mut self, id: MessageId) -> RepoResult<Option<Message>>;

    /// Insert a new message
    async fn insert_message(&mut self, message: &Message) -> RepoResult<()>;

    /// Persist every mutable column of an existing message
    async fn update_message(&mut self, message: &Message) -> RepoResult<()>;

    /// Append a history row
    async fn insert_history(&mut self, history: &MessageHistory) -> RepoResult<()>;

    /// Insert a notification
    async fn insert_notification(&mut self, notification: &Notification) -> RepoResult<()>;

    /// Delete a user, applying the storage cascade rules.
    /// Returns `false` if no such user existed.
    async fn delete_user(&mut self, id: UserId) -> RepoResult<bool>;

    /// Delete notifications targeted at the user
    async fn delete_notifications_for_user(&mut self, user_id: UserId) -> RepoResult<u64>;

    /// Delete notifications attached to messages the user received
    async fn delete_notifications_for_received(&mut self, user_id: UserId) -> RepoResult<u64>;

    /// Delete history rows the user authored
    async fn delete_history_by_editor(&mut self, user_id: UserId) -> RepoResult<u64>;

    /// Commit the transaction
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
