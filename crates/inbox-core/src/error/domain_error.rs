//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{MessageId, NotificationId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Notification not found: {0}")]
    NotificationNotFound(NotificationId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message content cannot be empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Cannot send a message to yourself")]
    SelfMessage,

    #[error("Parent message belongs to a different conversation")]
    ParentOutsideConversation,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a participant of this conversation")]
    NotParticipant,

    #[error("Only the receiver can mark a message read")]
    NotReceiver,

    #[error("Notification belongs to another user")]
    NotNotificationOwner,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already in use")]
    UsernameAlreadyExists,

    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Message already read")]
    AlreadyRead,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::SelfMessage => "SELF_MESSAGE",
            Self::ParentOutsideConversation => "PARENT_OUTSIDE_CONVERSATION",

            // Authorization
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::NotReceiver => "NOT_RECEIVER",
            Self::NotNotificationOwner => "NOT_NOTIFICATION_OWNER",

            // Conflict
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::AlreadyRead => "ALREADY_READ",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::MessageNotFound(_) | Self::NotificationNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
                | Self::SelfMessage
                | Self::ParentOutsideConversation
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotParticipant | Self::NotReceiver | Self::NotNotificationOwner
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameAlreadyExists | Self::EmailAlreadyExists | Self::AlreadyRead
        )
    }
}
