//! Test fixtures and data generators
//!
//! Client-side mirrors of the request and response bodies. Ids stay strings
//! so the tests see exactly what goes over the wire.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

// ============================================================================
// Requests
// ============================================================================

/// Registration request
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("testuser{suffix}"),
            email: format!("test{suffix}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            username: reg.username.clone(),
            password: reg.password.clone(),
        }
    }
}

/// Send message request
#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub receiver_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
}

impl SendMessageRequest {
    pub fn to(receiver_id: &str, content: &str) -> Self {
        Self {
            receiver_id: receiver_id.to_string(),
            content: content.to_string(),
            parent_message_id: None,
        }
    }

    pub fn reply(receiver_id: &str, content: &str, parent_id: &str) -> Self {
        Self {
            parent_message_id: Some(parent_id.to_string()),
            ..Self::to(receiver_id, content)
        }
    }
}

/// Edit message request
#[derive(Debug, Serialize)]
pub struct EditMessageRequest {
    pub content: String,
}

impl EditMessageRequest {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Auth response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User response
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub created_at: String,
}

/// Message response
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub timestamp: String,
    pub read: bool,
    pub edited: bool,
    pub edited_by: Option<String>,
    pub parent_message_id: Option<String>,
}

/// History row
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub id: String,
    pub message_id: String,
    pub old_content: String,
    pub edited_by: Option<String>,
    pub edited_at: String,
}

/// One node of a reply tree
#[derive(Debug, Deserialize)]
pub struct ThreadNode {
    #[serde(flatten)]
    pub message: MessageResponse,
    pub replies: Vec<ThreadNode>,
}

/// Thread view: root message, its replies and its history
#[derive(Debug, Deserialize)]
pub struct ThreadResponse {
    #[serde(flatten)]
    pub root: ThreadNode,
    pub history: Vec<HistoryResponse>,
}

/// Unread index entry
#[derive(Debug, Deserialize)]
pub struct UnreadMessageResponse {
    pub id: String,
    pub content: String,
    pub sender_id: String,
    pub timestamp: String,
}

/// Unread index
#[derive(Debug, Deserialize)]
pub struct UnreadMessagesResponse {
    pub count: usize,
    pub messages: Vec<UnreadMessageResponse>,
}

/// Per-counterpart summary
#[derive(Debug, Deserialize)]
pub struct ConversationSummary {
    pub user: UserResponse,
    pub last_message: MessageResponse,
    pub message_count: usize,
    pub unread_count: usize,
}

/// Conversation list
#[derive(Debug, Deserialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummary>,
    pub total_unread: i64,
}

/// Notification response
#[derive(Debug, Deserialize)]
pub struct NotificationResponse {
    pub id: String,
    pub user_id: String,
    pub message_id: String,
    pub timestamp: String,
    pub read: bool,
}

/// Uniform error body
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
