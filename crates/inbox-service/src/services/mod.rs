//! Business logic services
//!
//! This module contains the service layer: lifecycle hooks plus the message,
//! notification and account services that orchestrate them.

pub mod account;
pub mod context;
pub mod error;
pub mod hooks;
pub mod message;
pub mod notification;

#[cfg(test)]
pub(crate) mod testing;

// Re-export all services for convenience
pub use account::AccountService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use hooks::{cleanup_user_data, log_message_edit, notify_on_create, CleanupReport};
pub use message::MessageService;
pub use notification::NotificationService;
