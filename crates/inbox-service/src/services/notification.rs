//! Notification service

use inbox_core::value_objects::{NotificationId, UserId};
use inbox_core::DomainError;
use tracing::{debug, info, instrument};

use crate::dto::NotificationResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Notifications addressed to the user, newest first
    #[instrument(skip(self))]
    pub async fn list_notifications(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> ServiceResult<Vec<NotificationResponse>> {
        let notifications = self
            .ctx
            .notification_repo()
            .find_by_user(user_id, unread_only)
            .await?;

        Ok(notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect())
    }

    /// Mark one of the user's notifications read. Repeating it is harmless.
    #[instrument(skip(self))]
    pub async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> ServiceResult<NotificationResponse> {
        let mut notification = self
            .ctx
            .notification_repo()
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification", notification_id.to_string()))?;

        if !notification.is_owned_by(user_id) {
            return Err(DomainError::NotNotificationOwner.into());
        }

        if notification.read {
            debug!("Notification already read");
            return Ok(notification.into());
        }

        self.ctx.notification_repo().mark_read(notification_id).await?;
        notification.read = true;

        info!(notification_id = %notification_id, user_id = %user_id, "Notification marked read");

        Ok(notification.into())
    }
}
