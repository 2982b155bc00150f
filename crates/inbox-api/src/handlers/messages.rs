//! Message handlers
//!
//! Endpoints for sending, editing, threads, history and the unread index.

use axum::{extract::State, Json};
use inbox_core::MessageId;
use inbox_service::{
    EditMessageRequest, HistoryResponse, MessageResponse, MessageService, SendMessageRequest,
    ThreadResponse, UnreadMessagesResponse,
};

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Send a message
///
/// POST /messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let response = service.send_message(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Unread messages addressed to the caller
///
/// GET /messages/unread
pub async fn get_unread(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UnreadMessagesResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.unread_for(auth.user_id).await?;
    Ok(Json(response))
}

/// View a message with its reply tree and history
///
/// GET /messages/{message_id}
pub async fn get_thread(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath<MessageId>,
) -> ApiResult<Json<ThreadResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.get_thread(message_id, auth.user_id).await?;
    Ok(Json(response))
}

/// Edit message content
///
/// PATCH /messages/{message_id}
pub async fn edit_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath<MessageId>,
    ValidatedJson(request): ValidatedJson<EditMessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service
        .edit_message(message_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// Edit history, newest first
///
/// GET /messages/{message_id}/history
pub async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath<MessageId>,
) -> ApiResult<Json<Vec<HistoryResponse>>> {
    let service = MessageService::new(state.service_context());
    let response = service.get_history(message_id, auth.user_id).await?;
    Ok(Json(response))
}

/// Mark a received message read
///
/// POST /messages/{message_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath<MessageId>,
) -> ApiResult<NoContent> {
    let service = MessageService::new(state.service_context());
    service.mark_read(message_id, auth.user_id).await?;
    Ok(NoContent)
}
