//! Message model -> entity

use inbox_core::entities::{Message, UnreadMessage};
use inbox_core::value_objects::{MessageId, UserId};

use crate::models::{MessageModel, UnreadMessageModel};

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: MessageId::from_uuid(model.id),
            sender_id: UserId::from_uuid(model.sender_id),
            receiver_id: UserId::from_uuid(model.receiver_id),
            content: model.content,
            timestamp: model.timestamp,
            read: model.read,
            edited: model.edited,
            edited_by: model.edited_by.map(UserId::from_uuid),
            parent_message_id: model.parent_message_id.map(MessageId::from_uuid),
        }
    }
}

impl From<UnreadMessageModel> for UnreadMessage {
    fn from(model: UnreadMessageModel) -> Self {
        UnreadMessage {
            id: MessageId::from_uuid(model.id),
            content: model.content,
            sender_id: UserId::from_uuid(model.sender_id),
            timestamp: model.timestamp,
        }
    }
}
