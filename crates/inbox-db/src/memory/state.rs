//! Table state and write operations shared by the in-memory store and its transactions

use std::collections::{HashMap, HashSet};

use inbox_core::entities::{Message, MessageHistory, Notification, User};
use inbox_core::error::DomainError;
use inbox_core::traits::RepoResult;
use inbox_core::value_objects::{HistoryId, MessageId, NotificationId, UserId};

/// A stored row plus its insertion sequence, used to break timestamp ties
#[derive(Debug, Clone)]
pub(super) struct Row<T> {
    pub seq: u64,
    pub value: T,
}

#[derive(Debug, Clone)]
pub(super) struct UserRow {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub(super) struct State {
    next_seq: u64,
    pub users: HashMap<UserId, UserRow>,
    pub messages: HashMap<MessageId, Row<Message>>,
    pub history: HashMap<HistoryId, Row<MessageHistory>>,
    pub notifications: HashMap<NotificationId, Row<Notification>>,
}

/// A write recorded by a transaction and replayed on commit
#[derive(Debug, Clone)]
pub(super) enum Op {
    InsertMessage(Message),
    UpdateMessage(Message),
    InsertHistory(MessageHistory),
    InsertNotification(Notification),
    DeleteUser(UserId),
    DeleteNotificationsForUser(UserId),
    DeleteNotificationsForReceived(UserId),
    DeleteHistoryByEditor(UserId),
}

fn fk_violation(table: &str, column: &str) -> DomainError {
    DomainError::DatabaseError(format!(
        "insert or update on table \"{table}\" violates foreign key on \"{column}\""
    ))
}

fn duplicate_key(table: &str) -> DomainError {
    DomainError::DatabaseError(format!("duplicate key value in \"{table}\""))
}

impl State {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn insert_user(&mut self, user: &User, password_hash: &str) -> RepoResult<()> {
        if self.users.values().any(|row| row.user.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        if self.users.values().any(|row| row.user.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        self.users.insert(
            user.id,
            UserRow {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(())
    }

    /// Apply one write, enforcing the same constraints as the SQL schema.
    /// Returns the number of rows affected.
    pub fn apply(&mut self, op: &Op) -> RepoResult<u64> {
        match op {
            Op::InsertMessage(message) => {
                if self.messages.contains_key(&message.id) {
                    return Err(duplicate_key("messages"));
                }
                if !self.users.contains_key(&message.sender_id) {
                    return Err(fk_violation("messages", "sender_id"));
                }
                if !self.users.contains_key(&message.receiver_id) {
                    return Err(fk_violation("messages", "receiver_id"));
                }
                if message.sender_id == message.receiver_id {
                    return Err(DomainError::DatabaseError(
                        "new row for relation \"messages\" violates check constraint \"messages_not_self\"".to_string(),
                    ));
                }
                if let Some(parent) = message.parent_message_id {
                    if !self.messages.contains_key(&parent) {
                        return Err(fk_violation("messages", "parent_message_id"));
                    }
                }
                let seq = self.seq();
                self.messages.insert(
                    message.id,
                    Row {
                        seq,
                        value: message.clone(),
                    },
                );
                Ok(1)
            }
            Op::UpdateMessage(message) => {
                if let Some(editor) = message.edited_by {
                    if !self.users.contains_key(&editor) {
                        return Err(fk_violation("messages", "edited_by"));
                    }
                }
                let row = self
                    .messages
                    .get_mut(&message.id)
                    .ok_or(DomainError::MessageNotFound(message.id))?;
                row.value.content.clone_from(&message.content);
                row.value.read = message.read;
                row.value.edited = message.edited;
                row.value.edited_by = message.edited_by;
                Ok(1)
            }
            Op::InsertHistory(history) => {
                if !self.messages.contains_key(&history.message_id) {
                    return Err(fk_violation("message_history", "message_id"));
                }
                if let Some(editor) = history.edited_by {
                    if !self.users.contains_key(&editor) {
                        return Err(fk_violation("message_history", "edited_by"));
                    }
                }
                let seq = self.seq();
                self.history.insert(
                    history.id,
                    Row {
                        seq,
                        value: history.clone(),
                    },
                );
                Ok(1)
            }
            Op::InsertNotification(notification) => {
                if !self.users.contains_key(&notification.user_id) {
                    return Err(fk_violation("notifications", "user_id"));
                }
                if !self.messages.contains_key(&notification.message_id) {
                    return Err(fk_violation("notifications", "message_id"));
                }
                let seq = self.seq();
                self.notifications.insert(
                    notification.id,
                    Row {
                        seq,
                        value: notification.clone(),
                    },
                );
                Ok(1)
            }
            Op::DeleteUser(id) => Ok(u64::from(self.delete_user(*id))),
            Op::DeleteNotificationsForUser(user_id) => {
                Ok(retain_count(&mut self.notifications, |n| n.user_id != *user_id))
            }
            Op::DeleteNotificationsForReceived(user_id) => {
                let received: HashSet<MessageId> = self
                    .messages
                    .values()
                    .filter(|row| row.value.receiver_id == *user_id)
                    .map(|row| row.value.id)
                    .collect();
                Ok(retain_count(&mut self.notifications, |n| {
                    !received.contains(&n.message_id)
                }))
            }
            Op::DeleteHistoryByEditor(user_id) => Ok(retain_count(&mut self.history, |h| {
                h.edited_by != Some(*user_id)
            })),
        }
    }

    /// Remove a user and everything the schema cascades from it:
    /// messages they sent or received (and replies under those), history and
    /// notifications of removed messages, history they authored and
    /// notifications they own. `edited_by` on surviving messages is cleared.
    fn delete_user(&mut self, id: UserId) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }

        let mut removed: HashSet<MessageId> = self
            .messages
            .values()
            .filter(|row| row.value.is_participant(id))
            .map(|row| row.value.id)
            .collect();

        // Replies cascade through parent_message_id
        loop {
            let children: Vec<MessageId> = self
                .messages
                .values()
                .filter(|row| {
                    !removed.contains(&row.value.id)
                        && row
                            .value
                            .parent_message_id
                            .is_some_and(|parent| removed.contains(&parent))
                })
                .map(|row| row.value.id)
                .collect();
            if children.is_empty() {
                break;
            }
            removed.extend(children);
        }

        self.messages.retain(|mid, _| !removed.contains(mid));
        self.history.retain(|_, row| {
            !removed.contains(&row.value.message_id) && row.value.edited_by != Some(id)
        });
        self.notifications.retain(|_, row| {
            !removed.contains(&row.value.message_id) && row.value.user_id != id
        });
        for row in self.messages.values_mut() {
            if row.value.edited_by == Some(id) {
                row.value.edited_by = None;
            }
        }

        true
    }
}

fn retain_count<K, T>(table: &mut HashMap<K, Row<T>>, keep: impl Fn(&T) -> bool) -> u64
where
    K: Eq + std::hash::Hash,
{
    let before = table.len();
    table.retain(|_, row| keep(&row.value));
    (before - table.len()) as u64
}

/// Sort rows by a timestamp key, breaking ties by insertion order
pub(super) fn sorted_by<T: Clone, K: Ord>(
    rows: impl Iterator<Item = Row<T>>,
    key: impl Fn(&T) -> K,
    newest_first: bool,
) -> Vec<T> {
    let mut rows: Vec<Row<T>> = rows.collect();
    rows.sort_by(|a, b| key(&a.value).cmp(&key(&b.value)).then(a.seq.cmp(&b.seq)));
    if newest_first {
        rows.reverse();
    }
    rows.into_iter().map(|row| row.value).collect()
}
