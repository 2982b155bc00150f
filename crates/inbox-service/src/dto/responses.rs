//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Identifiers serialize as UUID strings.

use chrono::{DateTime, Utc};
use inbox_core::value_objects::{HistoryId, MessageId, NotificationId, UserId};
use serde::Serialize;

// ============================================================================
// Auth & User Responses
// ============================================================================

/// Public user profile
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated user, including private fields
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Returned by register and login
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

impl AuthResponse {
    pub fn new(access_token: String, expires_in: i64, user: CurrentUserResponse) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

// ============================================================================
// Message Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub edited: bool,
    pub edited_by: Option<UserId>,
    pub parent_message_id: Option<MessageId>,
}

/// A prior version of a message
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub id: HistoryId,
    pub message_id: MessageId,
    pub old_content: String,
    pub edited_by: Option<UserId>,
    pub edited_at: DateTime<Utc>,
}

/// A message and its nested replies
#[derive(Debug, Clone, Serialize)]
pub struct ThreadNode {
    #[serde(flatten)]
    pub message: MessageResponse,
    pub replies: Vec<ThreadNode>,
}

impl ThreadNode {
    /// Number of messages in this subtree, including the root
    pub fn message_count(&self) -> usize {
        1 + self.replies.iter().map(ThreadNode::message_count).sum::<usize>()
    }
}

/// Thread view: the message, its reply tree and its edit history
#[derive(Debug, Clone, Serialize)]
pub struct ThreadResponse {
    #[serde(flatten)]
    pub thread: ThreadNode,
    pub history: Vec<HistoryResponse>,
}

/// Unread index projection
#[derive(Debug, Clone, Serialize)]
pub struct UnreadMessageResponse {
    pub id: MessageId,
    pub content: String,
    pub sender_id: UserId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadMessagesResponse {
    pub count: usize,
    pub messages: Vec<UnreadMessageResponse>,
}

// ============================================================================
// Conversation Responses
// ============================================================================

/// One counterpart in the conversation list
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummaryResponse {
    pub user: UserResponse,
    pub last_message: MessageResponse,
    pub message_count: usize,
    pub unread_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummaryResponse>,
    pub total_unread: i64,
}

// ============================================================================
// Notification Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message_id: MessageId,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: String,
}

impl ReadinessResponse {
    pub fn new(store_ok: bool) -> Self {
        Self {
            status: if store_ok { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: if store_ok { "ok" } else { "unavailable" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
