//! In-memory implementation of every port
//!
//! Intended for tests and local development. Data is lost on restart.
//!
//! Transactions stage their writes on a snapshot of the tables and record
//! each operation. `commit` replays the recorded operations onto the live
//! tables under the write lock and swaps the result in, so a failing replay
//! leaves the live tables untouched. Dropping an uncommitted transaction
//! discards the staged snapshot.

mod repositories;
mod state;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use inbox_core::entities::{Message, MessageHistory, Notification};
use inbox_core::traits::{MessagingStore, RepoResult, StoreTx};
use inbox_core::value_objects::{MessageId, UserId};

use state::{Op, State};

/// Row counts per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub users: usize,
    pub messages: usize,
    pub history: usize,
    pub notifications: usize,
}

/// In-memory store implementing the repositories and the transactional store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;
        StoreStats {
            users: state.users.len(),
            messages: state.messages.len(),
            history: state.history.len(),
            notifications: state.notifications.len(),
        }
    }
}

#[async_trait]
impl MessagingStore for InMemoryStore {
    async fn begin(&self) -> RepoResult<Box<dyn StoreTx>> {
        let staged = self.state.read().await.clone();
        Ok(Box::new(InMemoryTx {
            live: Arc::clone(&self.state),
            staged,
            ops: Vec::new(),
        }))
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

/// An open in-memory transaction
pub struct InMemoryTx {
    live: Arc<RwLock<State>>,
    staged: State,
    ops: Vec<Op>,
}

impl InMemoryTx {
    fn record(&mut self, op: Op) -> RepoResult<u64> {
        let affected = self.staged.apply(&op)?;
        self.ops.push(op);
        Ok(affected)
    }
}

#[async_trait]
impl StoreTx for InMemoryTx {
    async fn find_message(&mut self, id: MessageId) -> RepoResult<Option<Message>> {
        Ok(self.staged.messages.get(&id).map(|row| row.value.clone()))
    }

    async fn insert_message(&mut self, message: &Message) -> RepoResult<()> {
        self.record(Op::InsertMessage(message.clone())).map(drop)
    }

    async fn update_message(&mut self, message: &Message) -> RepoResult<()> {
        self.record(Op::UpdateMessage(message.clone())).map(drop)
    }

    async fn insert_history(&mut self, history: &MessageHistory) -> RepoResult<()> {
        self.record(Op::InsertHistory(history.clone())).map(drop)
    }

    async fn insert_notification(&mut self, notification: &Notification) -> RepoResult<()> {
        self.record(Op::InsertNotification(notification.clone()))
            .map(drop)
    }

    async fn delete_user(&mut self, id: UserId) -> RepoResult<bool> {
        self.record(Op::DeleteUser(id)).map(|n| n > 0)
    }

    async fn delete_notifications_for_user(&mut self, user_id: UserId) -> RepoResult<u64> {
        self.record(Op::DeleteNotificationsForUser(user_id))
    }

    async fn delete_notifications_for_received(&mut self, user_id: UserId) -> RepoResult<u64> {
        self.record(Op::DeleteNotificationsForReceived(user_id))
    }

    async fn delete_history_by_editor(&mut self, user_id: UserId) -> RepoResult<u64> {
        self.record(Op::DeleteHistoryByEditor(user_id))
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let mut live = self.live.write().await;
        let mut next = live.clone();
        for op in &self.ops {
            next.apply(op)?;
        }
        *live = next;
        debug!(ops = self.ops.len(), "In-memory transaction committed");
        Ok(())
    }
}
