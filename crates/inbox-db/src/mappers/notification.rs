//! Notification model -> entity

use inbox_core::entities::Notification;
use inbox_core::value_objects::{MessageId, NotificationId, UserId};

use crate::models::NotificationModel;

impl From<NotificationModel> for Notification {
    fn from(model: NotificationModel) -> Self {
        Notification {
            id: NotificationId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            message_id: MessageId::from_uuid(model.message_id),
            timestamp: model.timestamp,
            read: model.read,
        }
    }
}
