//! Domain entities - core business objects

mod history;
mod message;
mod notification;
mod user;

pub use history::MessageHistory;
pub use message::{Message, UnreadMessage};
pub use notification::Notification;
pub use user::User;
