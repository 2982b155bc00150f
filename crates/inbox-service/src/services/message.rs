//! Message service
//!
//! Handles sending, editing, threads, conversations and the unread index.

use std::collections::HashMap;

use inbox_core::entities::Message;
use inbox_core::traits::ConversationQuery;
use inbox_core::value_objects::{MessageId, UserId};
use inbox_core::DomainError;
use tracing::{debug, info, instrument};

use crate::dto::{
    ConversationListResponse, ConversationSummaryResponse, EditMessageRequest, HistoryResponse,
    MessageResponse, SendMessageRequest, ThreadNode, ThreadResponse, UnreadMessageResponse,
    UnreadMessagesResponse, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::hooks;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a direct message, optionally replying to an earlier one
    #[instrument(skip(self, request), fields(receiver_id = %request.receiver_id))]
    pub async fn send_message(
        &self,
        sender_id: UserId,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        self.check_content(&request.content)?;

        if request.receiver_id == sender_id {
            return Err(DomainError::SelfMessage.into());
        }

        self.require_user(sender_id).await?;
        self.require_user(request.receiver_id).await?;

        let message = match request.parent_message_id {
            Some(parent_id) => {
                let parent = self.find_message(parent_id).await?;
                if !parent.is_between(sender_id, request.receiver_id) {
                    return Err(DomainError::ParentOutsideConversation.into());
                }
                Message::new_reply(sender_id, request.receiver_id, request.content, parent_id)
            }
            None => Message::new(sender_id, request.receiver_id, request.content),
        };

        let mut tx = self.ctx.store().begin().await?;
        tx.insert_message(&message).await?;
        let notification = hooks::notify_on_create(tx.as_mut(), &message).await?;
        tx.commit().await?;

        info!(
            message_id = %message.id,
            notification_id = %notification.id,
            "Message sent"
        );

        Ok(message.into())
    }

    /// Replace a message's content on behalf of `editor_id`
    ///
    /// Either participant may edit. The edit hook runs inside the same
    /// transaction as the update, so the history row and the new content
    /// commit together.
    #[instrument(skip(self, request))]
    pub async fn edit_message(
        &self,
        message_id: MessageId,
        editor_id: UserId,
        request: EditMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        self.check_content(&request.content)?;

        let mut tx = self.ctx.store().begin().await?;
        let committed = tx
            .find_message(message_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", message_id.to_string()))?;

        if !committed.is_participant(editor_id) {
            return Err(DomainError::NotParticipant.into());
        }

        if committed.content == request.content {
            debug!("Content unchanged, nothing to persist");
            return Ok(committed.into());
        }

        let mut pending = committed;
        pending.content = request.content;

        let history = hooks::log_message_edit(
            tx.as_mut(),
            &mut pending,
            Some(editor_id),
            self.ctx.messaging().history_policy,
        )
        .await?;

        tx.update_message(&pending).await?;
        tx.commit().await?;

        info!(
            message_id = %message_id,
            editor_id = %editor_id,
            history_recorded = history.is_some(),
            "Message edited"
        );

        Ok(pending.into())
    }

    /// A message with its full reply tree and edit history
    #[instrument(skip(self))]
    pub async fn get_thread(
        &self,
        message_id: MessageId,
        viewer_id: UserId,
    ) -> ServiceResult<ThreadResponse> {
        let root = self.find_visible(message_id, viewer_id).await?;

        // Collect descendants level by level; a reply always has a later
        // position in `order` than its parent.
        let mut order = vec![root.clone()];
        let mut children: HashMap<MessageId, Vec<MessageId>> = HashMap::new();
        let mut cursor = 0;
        while cursor < order.len() {
            let parent_id = order[cursor].id;
            let replies = self.ctx.message_repo().find_replies(parent_id).await?;
            if !replies.is_empty() {
                children.insert(parent_id, replies.iter().map(|m| m.id).collect());
                order.extend(replies);
            }
            cursor += 1;
        }

        let thread = build_tree(order, &mut children)
            .ok_or_else(|| ServiceError::internal("reply tree has no root"))?;

        let history = self
            .ctx
            .history_repo()
            .find_by_message(root.id)
            .await?
            .into_iter()
            .map(HistoryResponse::from)
            .collect();

        debug!(messages = thread.message_count(), "Thread loaded");

        Ok(ThreadResponse { thread, history })
    }

    /// Prior contents of a message, newest first
    #[instrument(skip(self))]
    pub async fn get_history(
        &self,
        message_id: MessageId,
        viewer_id: UserId,
    ) -> ServiceResult<Vec<HistoryResponse>> {
        let message = self.find_visible(message_id, viewer_id).await?;

        let history = self.ctx.history_repo().find_by_message(message.id).await?;

        Ok(history.into_iter().map(HistoryResponse::from).collect())
    }

    /// One summary per counterpart, most recent conversation first
    #[instrument(skip(self))]
    pub async fn list_conversations(
        &self,
        user_id: UserId,
    ) -> ServiceResult<ConversationListResponse> {
        let messages = self.ctx.message_repo().find_by_participant(user_id).await?;

        // Messages arrive newest first, so the first one seen per counterpart
        // is the latest and counterparts come out in recency order.
        let mut groups: Vec<(UserId, Vec<Message>)> = Vec::new();
        let mut index: HashMap<UserId, usize> = HashMap::new();
        for message in messages {
            let Some(other) = message.counterpart(user_id) else {
                continue;
            };
            match index.get(&other) {
                Some(&i) => groups[i].1.push(message),
                None => {
                    index.insert(other, groups.len());
                    groups.push((other, vec![message]));
                }
            }
        }

        let mut conversations = Vec::with_capacity(groups.len());
        for (other, messages) in groups {
            let Some(counterpart) = self.ctx.user_repo().find_by_id(other).await? else {
                continue;
            };
            let unread_count = messages.iter().filter(|m| m.is_unread_for(user_id)).count();
            let message_count = messages.len();
            let Some(last) = messages.into_iter().next() else {
                continue;
            };

            conversations.push(ConversationSummaryResponse {
                user: UserResponse::from(&counterpart),
                last_message: last.into(),
                message_count,
                unread_count,
            });
        }

        let total_unread = self.ctx.message_repo().count_unread_for_user(user_id).await?;

        Ok(ConversationListResponse {
            conversations,
            total_unread,
        })
    }

    /// Messages exchanged with one counterpart, newest first
    #[instrument(skip(self))]
    pub async fn get_conversation(
        &self,
        user_id: UserId,
        other_id: UserId,
        query: ConversationQuery,
    ) -> ServiceResult<Vec<MessageResponse>> {
        self.require_user(other_id).await?;

        let query = ConversationQuery {
            limit: query.limit.clamp(1, 100),
            ..query
        };

        let messages = self
            .ctx
            .message_repo()
            .find_conversation(user_id, other_id, query)
            .await?;

        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    /// The unread index for a receiver, oldest first
    #[instrument(skip(self))]
    pub async fn unread_for(&self, user_id: UserId) -> ServiceResult<UnreadMessagesResponse> {
        let messages: Vec<UnreadMessageResponse> = self
            .ctx
            .message_repo()
            .find_unread_for_user(user_id)
            .await?
            .into_iter()
            .map(UnreadMessageResponse::from)
            .collect();

        Ok(UnreadMessagesResponse {
            count: messages.len(),
            messages,
        })
    }

    /// Mark a message read; only its receiver may do so, and only once
    #[instrument(skip(self))]
    pub async fn mark_read(&self, message_id: MessageId, user_id: UserId) -> ServiceResult<()> {
        let message = self.find_message(message_id).await?;

        if message.receiver_id != user_id {
            return Err(DomainError::NotReceiver.into());
        }
        if message.read {
            return Err(DomainError::AlreadyRead.into());
        }

        // A concurrent reader may have won between the lookup and the update
        if !self.ctx.message_repo().mark_read(message_id, user_id).await? {
            return Err(DomainError::AlreadyRead.into());
        }

        info!(message_id = %message_id, user_id = %user_id, "Message marked read");

        Ok(())
    }

    // === Helpers ===

    fn check_content(&self, content: &str) -> ServiceResult<()> {
        if content.trim().is_empty() {
            return Err(DomainError::EmptyContent.into());
        }
        let max = self.ctx.messaging().max_content_length;
        if content.chars().count() > max {
            return Err(DomainError::ContentTooLong { max }.into());
        }
        Ok(())
    }

    async fn require_user(&self, user_id: UserId) -> ServiceResult<()> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    async fn find_message(&self, message_id: MessageId) -> ServiceResult<Message> {
        self.ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", message_id.to_string()))
    }

    async fn find_visible(&self, message_id: MessageId, viewer_id: UserId) -> ServiceResult<Message> {
        let message = self.find_message(message_id).await?;
        if !message.is_participant(viewer_id) {
            return Err(DomainError::NotParticipant.into());
        }
        Ok(message)
    }
}

/// Assemble a reply tree from messages listed parents-before-children.
/// Built bottom-up so arbitrarily deep chains never recurse.
fn build_tree(
    order: Vec<Message>,
    children: &mut HashMap<MessageId, Vec<MessageId>>,
) -> Option<ThreadNode> {
    let mut built: HashMap<MessageId, ThreadNode> = HashMap::with_capacity(order.len());
    let mut root = None;

    for message in order.into_iter().rev() {
        let id = message.id;
        let replies = children
            .remove(&id)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|child| built.remove(&child))
            .collect();

        let node = ThreadNode {
            message: message.into(),
            replies,
        };
        root = Some(id);
        built.insert(id, node);
    }

    root.and_then(|id| built.remove(&id))
}
