//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, conversations, health, messages, notifications, users};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes, kept outside rate limiting
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(conversation_routes())
        .merge(message_routes())
        .merge(notification_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).delete(users::delete_current_user),
        )
        .route("/users/:user_id", get(users::get_user))
}

/// Conversation routes
fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(conversations::list_conversations))
        .route("/conversations/:user_id", get(conversations::get_conversation))
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(messages::send_message))
        .route("/messages/unread", get(messages::get_unread))
        .route(
            "/messages/:message_id",
            get(messages::get_thread).patch(messages::edit_message),
        )
        .route("/messages/:message_id/history", get(messages::get_history))
        .route("/messages/:message_id/read", post(messages::mark_read))
}

/// Notification routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/:notification_id/read",
            post(notifications::mark_read),
        )
}
