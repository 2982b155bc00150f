//! API Integration Tests
//!
//! Each test spawns its own server backed by a fresh in-memory store, so no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, test_config, TestServer,
};
use reqwest::StatusCode;

async fn send(
    server: &TestServer,
    token: &str,
    request: &SendMessageRequest,
) -> MessageResponse {
    let response = server
        .post_auth("/api/v1/messages", token, request)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn unread(server: &TestServer, token: &str) -> UnreadMessagesResponse {
    let response = server.get_auth("/api/v1/messages/unread", token).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn notifications(server: &TestServer, token: &str, unread_only: bool) -> Vec<NotificationResponse> {
    let path = if unread_only {
        "/api/v1/notifications?unread=true"
    } else {
        "/api/v1/notifications"
    };
    let response = server.get_auth(path, token).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn history(server: &TestServer, token: &str, message_id: &str) -> Vec<HistoryResponse> {
    let response = server
        .get_auth(&format!("/api/v1/messages/{message_id}/history"), token)
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["store"], "ok");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_login() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let registered: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(registered.user.username, request.username);
    assert_eq!(registered.user.email.as_deref(), Some(request.email.as_str()));
    assert_eq!(registered.token_type, "Bearer");
    assert!(registered.expires_in > 0);

    let login = LoginRequest::from_register(&request);
    let response = server.post("/api/v1/auth/login", &login).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.id, registered.user.id);
    assert!(!auth.access_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/api/v1/auth/register", &request).await.unwrap();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "USERNAME_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_validation_details() {
    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest {
        username: "x".to_string(),
        email: "not-an-email".to_string(),
        password: "short".to_string(),
    };

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
    let details = body.error.details.expect("validation details");
    assert!(details.get("email").is_some());
    assert!(details.get("password").is_some());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = TestServer::start().await.expect("Failed to start server");
    let login = LoginRequest {
        username: "nobody".to_string(),
        password: "wrongpass".to_string(),
    };

    let response = server.post("/api/v1/auth/login", &login).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_current_user() {
    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.register_user().await.unwrap();

    let response = server.get_auth("/api/v1/users/@me", &auth.access_token).await.unwrap();
    let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, auth.user.id);
    assert!(me.email.is_some());

    let response = server.get("/api/v1/users/@me").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_public_profile_hides_email() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/users/{}", bob.user.id), &alice.access_token)
        .await
        .unwrap();
    let profile: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.username, bob.user.username);
    assert!(profile.email.is_none());
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_send_creates_one_notification_for_receiver() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();

    let message = send(
        &server,
        &alice.access_token,
        &SendMessageRequest::to(&bob.user.id, "Hello"),
    )
    .await;
    assert_eq!(message.sender_id, alice.user.id);
    assert!(!message.read);
    assert!(!message.edited);

    let for_bob = notifications(&server, &bob.access_token, false).await;
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].message_id, message.id);
    assert_eq!(for_bob[0].user_id, bob.user.id);
    assert!(notifications(&server, &alice.access_token, false).await.is_empty());
}

#[tokio::test]
async fn test_send_rejections() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();
    let token = &alice.access_token;

    let response = server
        .post_auth("/api/v1/messages", token, &SendMessageRequest::to(&alice.user.id, "me"))
        .await
        .unwrap();
    assert_eq!(assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(), "SELF_MESSAGE");

    let response = server
        .post_auth("/api/v1/messages", token, &SendMessageRequest::to(&bob.user.id, "   "))
        .await
        .unwrap();
    assert_eq!(assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(), "EMPTY_CONTENT");

    let long = "x".repeat(2001);
    let response = server
        .post_auth("/api/v1/messages", token, &SendMessageRequest::to(&bob.user.id, &long))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "CONTENT_TOO_LONG"
    );

    let response = server
        .post_auth(
            "/api/v1/messages",
            token,
            &SendMessageRequest::to("00000000-0000-4000-8000-000000000000", "hi"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .post_auth("/api/v1/messages", token, &SendMessageRequest::to("nope", "hi"))
        .await
        .unwrap();
    assert_eq!(assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(), "INVALID_BODY");

    let stats = server.stats().await;
    assert_eq!(stats.messages, 0);
    assert_eq!(stats.notifications, 0);
}

#[tokio::test]
async fn test_content_limit_is_configurable() {
    let config = test_config(&[("MESSAGE_MAX_CONTENT_LENGTH", "5")]).unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/messages",
            &alice.access_token,
            &SendMessageRequest::to(&bob.user.id, "too long"),
        )
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "CONTENT_TOO_LONG"
    );
}

#[tokio::test]
async fn test_edit_records_history_once() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();
    let message = send(
        &server,
        &alice.access_token,
        &SendMessageRequest::to(&bob.user.id, "Hello"),
    )
    .await;
    let path = format!("/api/v1/messages/{}", message.id);

    let response = server
        .patch_auth(&path, &alice.access_token, &EditMessageRequest::new("Hi"))
        .await
        .unwrap();
    let edited: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(edited.edited);
    assert_eq!(edited.content, "Hi");
    assert_eq!(edited.edited_by.as_deref(), Some(alice.user.id.as_str()));

    let rows = history(&server, &bob.access_token, &message.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].old_content, "Hello");
    assert_eq!(rows[0].edited_by.as_deref(), Some(alice.user.id.as_str()));

    // Second edit by the receiver: content changes, no new history row
    let response = server
        .patch_auth(&path, &bob.access_token, &EditMessageRequest::new("Hey"))
        .await
        .unwrap();
    let again: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(again.content, "Hey");
    assert_eq!(history(&server, &alice.access_token, &message.id).await.len(), 1);
}

#[tokio::test]
async fn test_every_edit_policy() {
    let config = test_config(&[("MESSAGE_HISTORY_POLICY", "every-edit")]).unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();
    let message = send(
        &server,
        &alice.access_token,
        &SendMessageRequest::to(&bob.user.id, "v1"),
    )
    .await;
    let path = format!("/api/v1/messages/{}", message.id);

    for content in ["v2", "v3"] {
        let response = server
            .patch_auth(&path, &alice.access_token, &EditMessageRequest::new(content))
            .await
            .unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let rows = history(&server, &alice.access_token, &message.id).await;
    let old: Vec<&str> = rows.iter().map(|r| r.old_content.as_str()).collect();
    assert_eq!(old, vec!["v2", "v1"]);
}

#[tokio::test]
async fn test_outsiders_are_forbidden() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();
    let mallory = server.register_user().await.unwrap();
    let message = send(
        &server,
        &alice.access_token,
        &SendMessageRequest::to(&bob.user.id, "private"),
    )
    .await;
    let path = format!("/api/v1/messages/{}", message.id);

    let response = server
        .patch_auth(&path, &mallory.access_token, &EditMessageRequest::new("pwned"))
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::FORBIDDEN).await.unwrap(),
        "NOT_PARTICIPANT"
    );

    let response = server
        .get_auth(&format!("{path}/history"), &mallory.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.get_auth(&path, &mallory.access_token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post_empty_auth(&format!("{path}/read"), &mallory.access_token)
        .await
        .unwrap();
    assert_eq!(assert_error(response, StatusCode::FORBIDDEN).await.unwrap(), "NOT_RECEIVER");
}

#[tokio::test]
async fn test_unknown_message_is_not_found() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let path = "/api/v1/messages/00000000-0000-4000-8000-000000000000";

    let response = server.get_auth(path, &alice.access_token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .get_auth(&format!("{path}/history"), &alice.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .post_empty_auth(&format!("{path}/read"), &alice.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_thread_view() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();
    let carol = server.register_user().await.unwrap();

    let root = send(
        &server,
        &alice.access_token,
        &SendMessageRequest::to(&bob.user.id, "root"),
    )
    .await;
    let first = send(
        &server,
        &bob.access_token,
        &SendMessageRequest::reply(&alice.user.id, "first", &root.id),
    )
    .await;
    send(
        &server,
        &alice.access_token,
        &SendMessageRequest::reply(&bob.user.id, "nested", &first.id),
    )
    .await;

    // A third party cannot hang a reply off someone else's conversation
    let response = server
        .post_auth(
            "/api/v1/messages",
            &carol.access_token,
            &SendMessageRequest::reply(&alice.user.id, "intrude", &root.id),
        )
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "PARENT_OUTSIDE_CONVERSATION"
    );

    let response = server
        .get_auth(&format!("/api/v1/messages/{}", root.id), &bob.access_token)
        .await
        .unwrap();
    let thread: ThreadResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(thread.root.message.id, root.id);
    assert_eq!(thread.root.replies.len(), 1);
    assert_eq!(thread.root.replies[0].message.id, first.id);
    assert_eq!(thread.root.replies[0].replies[0].message.content, "nested");
    assert_eq!(
        thread.root.replies[0].message.parent_message_id.as_deref(),
        Some(root.id.as_str())
    );
    assert!(thread.history.is_empty());
}

#[tokio::test]
async fn test_unread_index_and_mark_read() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();

    let first = send(
        &server,
        &alice.access_token,
        &SendMessageRequest::to(&bob.user.id, "one"),
    )
    .await;
    let second = send(
        &server,
        &alice.access_token,
        &SendMessageRequest::to(&bob.user.id, "two"),
    )
    .await;
    send(
        &server,
        &bob.access_token,
        &SendMessageRequest::to(&alice.user.id, "reply"),
    )
    .await;

    let index = unread(&server, &bob.access_token).await;
    assert_eq!(index.count, 2);
    let ids: Vec<&str> = index.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
    assert!(index.messages.iter().all(|m| m.sender_id == alice.user.id));

    let read_path = format!("/api/v1/messages/{}/read", first.id);
    let response = server.post_empty_auth(&read_path, &bob.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let index = unread(&server, &bob.access_token).await;
    assert_eq!(index.count, 1);
    assert_eq!(index.messages[0].id, second.id);

    let response = server.post_empty_auth(&read_path, &bob.access_token).await.unwrap();
    assert_eq!(assert_error(response, StatusCode::CONFLICT).await.unwrap(), "ALREADY_READ");

    // The sender never sees their own message as unread
    assert_eq!(unread(&server, &alice.access_token).await.count, 1);
}

// ============================================================================
// Conversation Tests
// ============================================================================

#[tokio::test]
async fn test_conversation_list_and_page() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();
    let carol = server.register_user().await.unwrap();

    for content in ["b1", "b2", "b3"] {
        send(
            &server,
            &bob.access_token,
            &SendMessageRequest::to(&alice.user.id, content),
        )
        .await;
    }
    send(
        &server,
        &carol.access_token,
        &SendMessageRequest::to(&alice.user.id, "c1"),
    )
    .await;

    let response = server.get_auth("/api/v1/conversations", &alice.access_token).await.unwrap();
    let list: ConversationListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.total_unread, 4);
    assert_eq!(list.conversations.len(), 2);
    assert_eq!(list.conversations[0].user.id, carol.user.id);
    assert_eq!(list.conversations[1].user.id, bob.user.id);
    assert_eq!(list.conversations[1].message_count, 3);
    assert_eq!(list.conversations[1].unread_count, 3);
    assert_eq!(list.conversations[1].last_message.content, "b3");

    let response = server
        .get_auth(
            &format!("/api/v1/conversations/{}?limit=2", bob.user.id),
            &alice.access_token,
        )
        .await
        .unwrap();
    let page: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["b3", "b2"]);

    let response = server
        .get_auth(
            &format!("/api/v1/conversations/{}?before=yesterday", bob.user.id),
            &alice.access_token,
        )
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "INVALID_QUERY_PARAMETER"
    );
}

// ============================================================================
// Notification Tests
// ============================================================================

#[tokio::test]
async fn test_notification_mark_read() {
    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register_user().await.unwrap();
    let bob = server.register_user().await.unwrap();
    send(
        &server,
        &alice.access_token,
        &SendMessageRequest::to(&bob.user.id, "ping"),
    )
    .await;

    let pending = notifications(&server, &bob.access_token, true).await;
    assert_eq!(pending.len(), 1);
    let path = format!("/api/v1/notifications/{}/read", pending[0].id);

    let response = server.post_empty_auth(&path, &alice.access_token).await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::FORBIDDEN).await.unwrap(),
        "NOT_NOTIFICATION_OWNER"
    );

    for _ in 0..2 {
        let response = server.post_empty_auth(&path, &bob.access_token).await.unwrap();
        let marked: NotificationResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert!(marked.read);
    }

    assert!(notifications(&server, &bob.access_token, true).await.is_empty());
    assert_eq!(notifications(&server, &bob.access_token, false).await.len(), 1);
}

// ============================================================================
// Account Deletion
// ============================================================================

#[tokio::test]
async fn test_hello_hi_lifecycle() {
    let server = TestServer::start().await.expect("Failed to start server");
    let a = server.register_user().await.unwrap();
    let b = server.register_user().await.unwrap();
    let c = server.register_user().await.unwrap();

    // A sends "Hello" to B: one notification for B
    let hello = send(&server, &a.access_token, &SendMessageRequest::to(&b.user.id, "Hello")).await;
    assert_eq!(notifications(&server, &b.access_token, false).await.len(), 1);

    // A edits to "Hi": one history row with the old content
    let response = server
        .patch_auth(
            &format!("/api/v1/messages/{}", hello.id),
            &a.access_token,
            &EditMessageRequest::new("Hi"),
        )
        .await
        .unwrap();
    let edited: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(edited.edited);
    let rows = history(&server, &b.access_token, &hello.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].old_content, "Hello");
    assert_eq!(rows[0].edited_by.as_deref(), Some(a.user.id.as_str()));

    // B marks it read: the unread index empties
    let response = server
        .post_empty_auth(&format!("/api/v1/messages/{}/read", hello.id), &b.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    assert_eq!(unread(&server, &b.access_token).await.count, 0);

    // B talks to C independently
    let independent = send(&server, &b.access_token, &SendMessageRequest::to(&c.user.id, "hey c")).await;

    // A is deleted
    let response = server.delete_auth("/api/v1/users/@me", &a.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let stats = server.stats().await;
    assert_eq!(stats.users, 2);
    assert_eq!(stats.messages, 1);
    assert_eq!(stats.history, 0);
    assert_eq!(stats.notifications, 1);
    assert!(notifications(&server, &b.access_token, false).await.is_empty());

    let response = server
        .get_auth(&format!("/api/v1/messages/{}", independent.id), &c.access_token)
        .await
        .unwrap();
    let thread: ThreadResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread.root.message.content, "hey c");

    // The deleted account's token no longer resolves to a user
    let response = server.get_auth("/api/v1/users/@me", &a.access_token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
    let response = server.delete_auth("/api/v1/users/@me", &a.access_token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
