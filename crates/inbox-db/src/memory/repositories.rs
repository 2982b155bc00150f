//! Read-side repository traits for [`InMemoryStore`]

use async_trait::async_trait;

use inbox_core::entities::{Message, MessageHistory, Notification, UnreadMessage, User};
use inbox_core::error::DomainError;
use inbox_core::traits::{
    ConversationQuery, HistoryRepository, MessageRepository, NotificationRepository, RepoResult,
    UserRepository,
};
use inbox_core::value_objects::{MessageId, NotificationId, UserId};

use super::state::sorted_by;
use super::InMemoryStore;

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|row| row.user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|row| row.user.username == username)
            .map(|row| row.user.clone()))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|row| row.user.username == username))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.values().any(|row| row.user.email == email))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state.write().await;
        state.insert_user(user, password_hash)
    }

    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|row| row.password_hash.clone()))
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>> {
        let state = self.state.read().await;
        Ok(state.messages.get(&id).map(|row| row.value.clone()))
    }

    async fn find_replies(&self, parent_id: MessageId) -> RepoResult<Vec<Message>> {
        let state = self.state.read().await;
        let rows = state
            .messages
            .values()
            .filter(|row| row.value.parent_message_id == Some(parent_id))
            .cloned();
        Ok(sorted_by(rows, |m| m.timestamp, false))
    }

    async fn find_by_participant(&self, user_id: UserId) -> RepoResult<Vec<Message>> {
        let state = self.state.read().await;
        let rows = state
            .messages
            .values()
            .filter(|row| row.value.is_participant(user_id))
            .cloned();
        Ok(sorted_by(rows, |m| m.timestamp, true))
    }

    async fn find_conversation(
        &self,
        user_id: UserId,
        other_id: UserId,
        query: ConversationQuery,
    ) -> RepoResult<Vec<Message>> {
        let limit = usize::try_from(query.limit.clamp(1, 100)).unwrap_or(100);
        let state = self.state.read().await;
        let rows = state
            .messages
            .values()
            .filter(|row| row.value.is_between(user_id, other_id))
            .filter(|row| query.admits(&row.value))
            .cloned();
        let mut messages = sorted_by(rows, |m| (m.timestamp, m.id), true);
        messages.truncate(limit);
        Ok(messages)
    }

    async fn find_unread_for_user(&self, user_id: UserId) -> RepoResult<Vec<UnreadMessage>> {
        let state = self.state.read().await;
        let rows = state
            .messages
            .values()
            .filter(|row| row.value.is_unread_for(user_id))
            .cloned();
        Ok(sorted_by(rows, |m| m.timestamp, false)
            .iter()
            .map(UnreadMessage::from)
            .collect())
    }

    async fn count_unread_for_user(&self, user_id: UserId) -> RepoResult<i64> {
        let state = self.state.read().await;
        let count = state
            .messages
            .values()
            .filter(|row| row.value.is_unread_for(user_id))
            .count();
        Ok(count as i64)
    }

    async fn mark_read(&self, id: MessageId, receiver_id: UserId) -> RepoResult<bool> {
        let mut state = self.state.write().await;
        match state.messages.get_mut(&id) {
            Some(row) if row.value.is_unread_for(receiver_id) => {
                row.value.read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn find_by_id(&self, id: NotificationId) -> RepoResult<Option<Notification>> {
        let state = self.state.read().await;
        Ok(state.notifications.get(&id).map(|row| row.value.clone()))
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> RepoResult<Vec<Notification>> {
        let state = self.state.read().await;
        let rows = state
            .notifications
            .values()
            .filter(|row| row.value.user_id == user_id && !(unread_only && row.value.read))
            .cloned();
        Ok(sorted_by(rows, |n| n.timestamp, true))
    }

    async fn find_by_message(&self, message_id: MessageId) -> RepoResult<Vec<Notification>> {
        let state = self.state.read().await;
        let rows = state
            .notifications
            .values()
            .filter(|row| row.value.message_id == message_id)
            .cloned();
        Ok(sorted_by(rows, |n| n.timestamp, false))
    }

    async fn mark_read(&self, id: NotificationId) -> RepoResult<()> {
        let mut state = self.state.write().await;
        let row = state
            .notifications
            .get_mut(&id)
            .ok_or(DomainError::NotificationNotFound(id))?;
        row.value.read = true;
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryStore {
    async fn find_by_message(&self, message_id: MessageId) -> RepoResult<Vec<MessageHistory>> {
        let state = self.state.read().await;
        let rows = state
            .history
            .values()
            .filter(|row| row.value.message_id == message_id)
            .cloned();
        Ok(sorted_by(rows, |h| h.edited_at, true))
    }

    async fn count_by_message(&self, message_id: MessageId) -> RepoResult<i64> {
        let state = self.state.read().await;
        let count = state
            .history
            .values()
            .filter(|row| row.value.message_id == message_id)
            .count();
        Ok(count as i64)
    }
}
