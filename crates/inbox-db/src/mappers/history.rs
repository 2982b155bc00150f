//! History model -> entity

use inbox_core::entities::MessageHistory;
use inbox_core::value_objects::{HistoryId, MessageId, UserId};

use crate::models::HistoryModel;

impl From<HistoryModel> for MessageHistory {
    fn from(model: HistoryModel) -> Self {
        MessageHistory {
            id: HistoryId::from_uuid(model.id),
            message_id: MessageId::from_uuid(model.message_id),
            old_content: model.old_content,
            edited_by: model.edited_by.map(UserId::from_uuid),
            edited_at: model.edited_at,
        }
    }
}
