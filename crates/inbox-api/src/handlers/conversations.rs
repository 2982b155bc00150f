//! Conversation handlers

use axum::{extract::State, Json};
use inbox_core::UserId;
use inbox_service::{ConversationListResponse, MessageResponse, MessageService};

use crate::extractors::{AuthUser, IdPath, Pagination};
use crate::response::ApiResult;
use crate::state::AppState;

/// One summary per counterpart, most recent first
///
/// GET /conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ConversationListResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.list_conversations(auth.user_id).await?;
    Ok(Json(response))
}

/// Messages exchanged with one user, newest first
///
/// GET /conversations/{user_id}?before=&limit=
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(other_id): IdPath<UserId>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let messages = service
        .get_conversation(auth.user_id, other_id, pagination.into())
        .await?;
    Ok(Json(messages))
}
