//! Repository implementations
//!
//! PostgreSQL implementations of the ports defined in inbox-core.
//! Read-side repositories query the pool directly; hook-carrying writes go
//! through [`PgMessagingStore`].

mod error;
mod history;
mod message;
mod notification;
mod store;
mod user;

pub use history::PgHistoryRepository;
pub use message::PgMessageRepository;
pub use notification::PgNotificationRepository;
pub use store::{PgMessagingStore, PgStoreTx};
pub use user::PgUserRepository;
