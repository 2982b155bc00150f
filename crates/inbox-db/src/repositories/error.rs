//! Error handling utilities for repositories

use inbox_core::error::DomainError;
use inbox_core::value_objects::{MessageId, NotificationId};
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation on the users table to the matching conflict
pub fn map_user_unique_violation(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => DomainError::EmailAlreadyExists,
                _ => DomainError::UsernameAlreadyExists,
            };
        }
    }
    DomainError::DatabaseError(e.to_string())
}

pub fn message_not_found(id: MessageId) -> DomainError {
    DomainError::MessageNotFound(id)
}

pub fn notification_not_found(id: NotificationId) -> DomainError {
    DomainError::NotificationNotFound(id)
}

