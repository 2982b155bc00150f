//! Message lifecycle hooks
//!
//! Side effects tied to message and account writes. Each hook runs on the
//! caller's open [`StoreTx`], so it commits or rolls back together with the
//! write that triggered it.

use inbox_core::entities::{Message, MessageHistory, Notification};
use inbox_core::traits::StoreTx;
use inbox_core::value_objects::{HistoryPolicy, UserId};
use serde::Serialize;
use tracing::{debug, instrument};

use super::error::ServiceResult;

/// Rows removed by [`cleanup_user_data`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub notifications_for_user: u64,
    pub notifications_for_received: u64,
    pub history_by_editor: u64,
}

impl CleanupReport {
    pub fn total(&self) -> u64 {
        self.notifications_for_user + self.notifications_for_received + self.history_by_editor
    }
}

/// Edit interception, run before `pending` is persisted.
///
/// Compares `pending` with the committed row. On a content change the editor
/// (falling back to the sender) becomes `edited_by`, and if `policy` allows it
/// the committed content is appended to the history and `pending.edited` is
/// set. A missing committed row means there is no prior state and nothing
/// happens.
#[instrument(skip(tx, pending), fields(message_id = %pending.id))]
pub async fn log_message_edit(
    tx: &mut dyn StoreTx,
    pending: &mut Message,
    editor: Option<UserId>,
    policy: HistoryPolicy,
) -> ServiceResult<Option<MessageHistory>> {
    let Some(committed) = tx.find_message(pending.id).await? else {
        return Ok(None);
    };

    if committed.content == pending.content {
        return Ok(None);
    }

    let editor = editor.unwrap_or(pending.sender_id);
    pending.edited_by = Some(editor);

    if !policy.should_record(committed.edited) {
        debug!(%policy, "Content changed on an edited message, history not recorded");
        return Ok(None);
    }

    let history = MessageHistory::record(&committed, editor);
    tx.insert_history(&history).await?;
    pending.edited = true;

    Ok(Some(history))
}

/// Creation hook, run right after a message is first inserted.
/// Notifies the receiver exactly once.
#[instrument(skip(tx, message), fields(message_id = %message.id))]
pub async fn notify_on_create(
    tx: &mut dyn StoreTx,
    message: &Message,
) -> ServiceResult<Notification> {
    let notification = Notification::for_message(message);
    tx.insert_notification(&notification).await?;
    Ok(notification)
}

/// Cascade cleanup, run after a user row is deleted.
///
/// Removes notifications the user owned, notifications for messages they
/// received, and history rows they authored. Safe to repeat: a second run
/// deletes nothing.
#[instrument(skip(tx))]
pub async fn cleanup_user_data(
    tx: &mut dyn StoreTx,
    user_id: UserId,
) -> ServiceResult<CleanupReport> {
    let report = CleanupReport {
        notifications_for_user: tx.delete_notifications_for_user(user_id).await?,
        notifications_for_received: tx.delete_notifications_for_received(user_id).await?,
        history_by_editor: tx.delete_history_by_editor(user_id).await?,
    };
    debug!(removed = report.total(), "User data cleaned up");
    Ok(report)
}
