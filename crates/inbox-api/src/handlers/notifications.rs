//! Notification handlers

use axum::{extract::State, Json};
use inbox_core::NotificationId;
use inbox_service::{NotificationResponse, NotificationService};

use crate::extractors::{AuthUser, IdPath, NotificationFilter};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /notifications?unread=true
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    filter: NotificationFilter,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let service = NotificationService::new(state.service_context());
    let response = service
        .list_notifications(auth.user_id, filter.unread)
        .await?;
    Ok(Json(response))
}

/// POST /notifications/{notification_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(notification_id): IdPath<NotificationId>,
) -> ApiResult<Json<NotificationResponse>> {
    let service = NotificationService::new(state.service_context());
    let response = service
        .mark_notification_read(notification_id, auth.user_id)
        .await?;
    Ok(Json(response))
}
