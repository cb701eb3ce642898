use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::live::{ChangeEvent, LiveQuery, Topic};
use crate::models::{Message, MessageView};
use crate::services::conversation_service::ConversationService;
use crate::state::AppState;

/// Sidebar preview text: message content capped at `max_chars` characters.
fn truncate_preview(content: &str, max_chars: usize) -> String {
    content.chars().take(max_chars).collect()
}

pub struct MessageService;

impl MessageService {
    /// Append a message and refresh the owning conversation's summary
    /// fields. A send also ends the sender's typing session. Returns the
    /// new message id.
    pub async fn send_message(
        state: &AppState,
        conversation_id: Uuid,
        sender_id: &str,
        content: &str,
    ) -> AppResult<Uuid> {
        let conversation =
            ConversationService::require_participant(state, conversation_id, sender_id).await?;

        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            is_deleted: false,
            edited_at: None,
            reactions: HashMap::new(),
            sequence_number: 0, // stamped by the table
            created_at: now,
        };
        let message_id = state.store.messages.write().await.insert(message);

        {
            let mut conversations = state.store.conversations.write().await;
            if let Some(c) = conversations.get_mut(&conversation_id) {
                c.last_message_time = now;
                c.last_message_preview =
                    truncate_preview(content, state.config.preview_max_chars);
            }
        }

        let typing_cleared = state
            .store
            .typing
            .write()
            .await
            .remove(&(conversation_id, sender_id.to_string()))
            .is_some();

        tracing::debug!(
            conversation_id = %conversation_id,
            message_id = %message_id,
            "message sent"
        );

        let conversation_topic = [Topic::Conversation(conversation_id)];
        state
            .registry
            .publish(
                &conversation_topic,
                ChangeEvent::MessageNew {
                    conversation_id,
                    message_id,
                },
            )
            .await;
        if typing_cleared {
            state
                .registry
                .publish(
                    &conversation_topic,
                    ChangeEvent::TypingChanged { conversation_id },
                )
                .await;
        }

        let mut summary_topics = vec![Topic::Conversation(conversation_id)];
        summary_topics.extend(conversation.participant_ids.into_iter().map(Topic::User));
        state
            .registry
            .publish(
                &summary_topics,
                ChangeEvent::ConversationUpdated { conversation_id },
            )
            .await;

        Ok(message_id)
    }

    /// Conversation history in append order. Soft-deleted messages come
    /// through as tombstones. Unknown conversations read as empty.
    pub async fn get_messages(
        state: &AppState,
        conversation_id: Uuid,
    ) -> AppResult<Vec<MessageView>> {
        let messages = state.store.messages.read().await;
        Ok(messages
            .conversation_messages(conversation_id)
            .into_iter()
            .map(Message::to_view)
            .collect())
    }

    /// Edit a message's content. Only the original sender may edit, and only
    /// while the message is not deleted; a missing message reads the same as
    /// someone else's. Sets the edited marker. If the message is the newest
    /// in its conversation, the sidebar preview follows the new content.
    pub async fn edit_message(
        state: &AppState,
        message_id: Uuid,
        sender_id: &str,
        new_content: &str,
    ) -> AppResult<()> {
        let (conversation_id, is_latest) = {
            let mut messages = state.store.messages.write().await;
            let conversation_id = match messages.get_mut(&message_id) {
                Some(message) if message.sender_id == sender_id => {
                    if message.is_deleted {
                        return Err(AppError::AlreadyDeleted);
                    }
                    message.content = new_content.to_string();
                    message.edited_at = Some(Utc::now());
                    message.conversation_id
                }
                _ => return Err(AppError::Forbidden),
            };
            let is_latest = messages.latest_in_conversation(conversation_id) == Some(message_id);
            (conversation_id, is_latest)
        };

        let participants = if is_latest {
            let mut conversations = state.store.conversations.write().await;
            conversations.get_mut(&conversation_id).map(|c| {
                c.last_message_preview =
                    truncate_preview(new_content, state.config.preview_max_chars);
                c.participant_ids.clone()
            })
        } else {
            None
        };

        tracing::debug!(message_id = %message_id, "message edited");
        state
            .registry
            .publish(
                &[Topic::Conversation(conversation_id)],
                ChangeEvent::MessageEdited {
                    conversation_id,
                    message_id,
                },
            )
            .await;
        if let Some(participants) = participants {
            let mut topics = vec![Topic::Conversation(conversation_id)];
            topics.extend(participants.into_iter().map(Topic::User));
            state
                .registry
                .publish(
                    &topics,
                    ChangeEvent::ConversationUpdated { conversation_id },
                )
                .await;
        }
        Ok(())
    }

    /// Soft delete. Only the sender may delete; the row (and its reactions)
    /// stays in the store but renders as a tombstone from here on.
    pub async fn delete_message(
        state: &AppState,
        message_id: Uuid,
        sender_id: &str,
    ) -> AppResult<()> {
        let conversation_id = {
            let mut messages = state.store.messages.write().await;
            match messages.get_mut(&message_id) {
                Some(message) if message.sender_id == sender_id => {
                    message.is_deleted = true;
                    message.conversation_id
                }
                _ => return Err(AppError::Forbidden),
            }
        };

        tracing::debug!(message_id = %message_id, "message soft-deleted");
        state
            .registry
            .publish(
                &[Topic::Conversation(conversation_id)],
                ChangeEvent::MessageDeleted {
                    conversation_id,
                    message_id,
                },
            )
            .await;
        Ok(())
    }

    /// Flip membership of `user_id` in the reactor list for `emoji`: absent
    /// adds, present removes. An emoji whose reactor list empties is dropped
    /// entirely, so toggling twice restores the prior state.
    pub async fn toggle_reaction(
        state: &AppState,
        message_id: Uuid,
        user_id: &str,
        emoji: &str,
    ) -> AppResult<()> {
        let conversation_id = {
            let mut messages = state.store.messages.write().await;
            let message = messages.get_mut(&message_id).ok_or(AppError::NotFound)?;

            let reactors = message.reactions.entry(emoji.to_string()).or_default();
            match reactors.iter().position(|r| r == user_id) {
                Some(pos) => {
                    reactors.remove(pos);
                }
                None => reactors.push(user_id.to_string()),
            }
            if message
                .reactions
                .get(emoji)
                .is_some_and(|reactors| reactors.is_empty())
            {
                message.reactions.remove(emoji);
            }
            message.conversation_id
        };

        state
            .registry
            .publish(
                &[Topic::Conversation(conversation_id)],
                ChangeEvent::ReactionToggled {
                    conversation_id,
                    message_id,
                    emoji: emoji.to_string(),
                },
            )
            .await;
        Ok(())
    }

    pub fn watch_messages(
        state: &AppState,
        conversation_id: Uuid,
    ) -> LiveQuery<Vec<MessageView>> {
        let state_clone = state.clone();
        LiveQuery::spawn(
            state.registry.clone(),
            vec![Topic::Conversation(conversation_id)],
            move || {
                let state = state_clone.clone();
                async move {
                    Self::get_messages(&state, conversation_id)
                        .await
                        .unwrap_or_default()
                }
            },
        )
    }
}
