//! Ports implemented by the infrastructure layer

mod repositories;
mod store;

pub use repositories::{
    ConversationQuery, HistoryRepository, MessageRepository, NotificationRepository, RepoResult,
    UserRepository,
};
pub use store::{MessagingStore, StoreTx};
