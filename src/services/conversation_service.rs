use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::live::{ChangeEvent, LiveQuery, Topic};
use crate::models::{Conversation, ConversationKind};
use crate::state::AppState;

pub struct ConversationService;

impl ConversationService {
    /// Find the direct conversation between two users, creating it on first
    /// contact. The duplicate scan and the insert run under one table write
    /// guard, so repeated or concurrent calls for the same pair always
    /// resolve to a single conversation id, in either argument order.
    pub async fn get_or_create_direct(
        state: &AppState,
        user_a: &str,
        user_b: &str,
    ) -> AppResult<Uuid> {
        let id = {
            let mut conversations = state.store.conversations.write().await;
            if let Some(existing) = conversations
                .values()
                .find(|c| c.is_direct_between(user_a, user_b))
            {
                return Ok(existing.id);
            }

            let now = Utc::now();
            let conversation = Conversation {
                id: Uuid::new_v4(),
                kind: ConversationKind::Direct,
                participant_ids: vec![user_a.to_string(), user_b.to_string()],
                group_name: None,
                group_creator_id: None,
                // No messages yet: sidebar ordering falls back to creation time
                last_message_time: now,
                last_message_preview: String::new(),
                created_at: now,
            };
            let id = conversation.id;
            conversations.insert(id, conversation);
            id
        };

        tracing::info!(conversation_id = %id, "direct conversation created");
        state
            .registry
            .publish(
                &[
                    Topic::Conversation(id),
                    Topic::User(user_a.to_string()),
                    Topic::User(user_b.to_string()),
                ],
                ChangeEvent::ConversationCreated {
                    conversation_id: id,
                },
            )
            .await;
        Ok(id)
    }

    /// Create a group conversation. The creator is always a participant;
    /// duplicate member ids collapse. No uniqueness constraint on name or
    /// membership.
    pub async fn create_group(
        state: &AppState,
        name: &str,
        participant_ids: Vec<String>,
        creator_id: &str,
    ) -> AppResult<Uuid> {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("group name cannot be empty".into()));
        }
        if name.len() > 255 {
            return Err(AppError::BadRequest("group name too long (max 255)".into()));
        }

        let mut participants = vec![creator_id.to_string()];
        for id in participant_ids {
            if !participants.contains(&id) {
                participants.push(id);
            }
        }

        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            kind: ConversationKind::Group,
            participant_ids: participants.clone(),
            group_name: Some(name.to_string()),
            group_creator_id: Some(creator_id.to_string()),
            last_message_time: now,
            last_message_preview: String::new(),
            created_at: now,
        };
        let id = conversation.id;
        state
            .store
            .conversations
            .write()
            .await
            .insert(id, conversation);

        tracing::info!(conversation_id = %id, members = participants.len(), "group conversation created");
        let mut topics = vec![Topic::Conversation(id)];
        topics.extend(participants.into_iter().map(Topic::User));
        state
            .registry
            .publish(
                &topics,
                ChangeEvent::ConversationCreated {
                    conversation_id: id,
                },
            )
            .await;
        Ok(id)
    }

    /// All conversations the user participates in, most recent message
    /// first. Conversations with no messages sort by their creation time,
    /// which seeds `last_message_time`.
    pub async fn get_my_conversations(state: &AppState, user_id: &str) -> Vec<Conversation> {
        let conversations = state.store.conversations.read().await;
        let mut mine: Vec<Conversation> = conversations
            .values()
            .filter(|c| c.has_participant(user_id))
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        mine
    }

    /// Point lookup; absent is `None`, not an error.
    pub async fn get_conversation(state: &AppState, id: Uuid) -> Option<Conversation> {
        state.store.conversations.read().await.get(&id).cloned()
    }

    /// Guard for write paths: the conversation must exist and the user must
    /// be one of its participants.
    pub async fn require_participant(
        state: &AppState,
        conversation_id: Uuid,
        user_id: &str,
    ) -> AppResult<Conversation> {
        let conversation = Self::get_conversation(state, conversation_id)
            .await
            .ok_or(AppError::NotFound)?;
        if !conversation.has_participant(user_id) {
            return Err(AppError::Forbidden);
        }
        Ok(conversation)
    }

    pub fn watch_conversation(state: &AppState, id: Uuid) -> LiveQuery<Option<Conversation>> {
        let state_clone = state.clone();
        LiveQuery::spawn(
            state.registry.clone(),
            vec![Topic::Conversation(id)],
            move || {
                let state = state_clone.clone();
                async move { Self::get_conversation(&state, id).await }
            },
        )
    }

    pub fn watch_my_conversations(state: &AppState, user_id: String) -> LiveQuery<Vec<Conversation>> {
        let state_clone = state.clone();
        let topic_id = user_id.clone();
        LiveQuery::spawn(
            state.registry.clone(),
            vec![Topic::User(topic_id)],
            move || {
                let state = state_clone.clone();
                let user_id = user_id.clone();
                async move { Self::get_my_conversations(&state, &user_id).await }
            },
        )
    }
}
