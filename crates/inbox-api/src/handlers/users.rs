//! User handlers
//!
//! Endpoints for the caller's profile, public profiles and account deletion.

use axum::{extract::State, Json};
use inbox_core::UserId;
use inbox_service::{AccountService, CurrentUserResponse, UserResponse};
use tracing::info;

use crate::extractors::{AuthUser, IdPath};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Get current user
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.get_current_user(auth.user_id).await?;
    Ok(Json(response))
}

/// Delete the caller's account along with their messages, history and notifications
///
/// DELETE /users/@me
pub async fn delete_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoContent> {
    let service = AccountService::new(state.service_context());
    let report = service.delete_account(auth.user_id).await?;
    info!(user_id = %auth.user_id, swept = report.total(), "Account removed via API");
    Ok(NoContent)
}

/// Get user by ID (public profile)
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(user_id): IdPath<UserId>,
) -> ApiResult<Json<UserResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.get_user(user_id).await?;
    Ok(Json(response))
}
