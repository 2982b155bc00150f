//! # inbox-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! transactional store port.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Message, MessageHistory, Notification, UnreadMessage, User};
pub use error::DomainError;
pub use traits::{
    ConversationQuery, HistoryRepository, MessageRepository, MessagingStore,
    NotificationRepository, RepoResult, StoreTx, UserRepository,
};
pub use value_objects::{HistoryId, HistoryPolicy, IdParseError, MessageId, NotificationId, UserId};
