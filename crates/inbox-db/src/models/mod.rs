//! Database models - SQLx-compatible structs for PostgreSQL tables

mod history;
mod message;
mod notification;
mod user;

pub use history::HistoryModel;
pub use message::{MessageModel, UnreadMessageModel};
pub use notification::NotificationModel;
pub use user::UserModel;
