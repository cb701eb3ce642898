use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppResult;
use crate::live::{ChangeEvent, LiveQuery, Topic};
use crate::models::ReadReceipt;
use crate::services::conversation_service::ConversationService;
use crate::state::AppState;

pub struct ReadReceiptService;

impl ReadReceiptService {
    /// Advance the caller's read watermark to now. Upserts in place — there
    /// is never more than one receipt per (conversation, user) — and never
    /// moves backwards, so rapid repeated calls are idempotent in effect.
    pub async fn mark_as_read(
        state: &AppState,
        conversation_id: Uuid,
        user_id: &str,
    ) -> AppResult<()> {
        ConversationService::require_participant(state, conversation_id, user_id).await?;

        let now = Utc::now();
        {
            let mut receipts = state.store.read_receipts.write().await;
            let key = (conversation_id, user_id.to_string());
            match receipts.get_mut(&key) {
                Some(receipt) => {
                    if now > receipt.last_read_time {
                        receipt.last_read_time = now;
                    }
                }
                None => {
                    receipts.insert(
                        key,
                        ReadReceipt {
                            conversation_id,
                            user_id: user_id.to_string(),
                            last_read_time: now,
                        },
                    );
                }
            }
        }

        tracing::debug!(conversation_id = %conversation_id, user_id = %user_id, "marked read");
        state
            .registry
            .publish(
                &[
                    Topic::Conversation(conversation_id),
                    Topic::User(user_id.to_string()),
                ],
                ChangeEvent::ReceiptAdvanced {
                    conversation_id,
                    user_id: user_id.to_string(),
                },
            )
            .await;
        Ok(())
    }

    /// Unread messages in one conversation: authored by someone else,
    /// created strictly after the watermark. No receipt means everything
    /// from others is unread.
    pub async fn get_unread_count(
        state: &AppState,
        conversation_id: Uuid,
        user_id: &str,
    ) -> i64 {
        let watermark = {
            let receipts = state.store.read_receipts.read().await;
            receipts
                .get(&(conversation_id, user_id.to_string()))
                .map(|r| r.last_read_time)
        };
        let messages = state.store.messages.read().await;
        Self::count_unread(
            messages.conversation_messages(conversation_id).as_slice(),
            user_id,
            watermark,
        )
    }

    /// Unread counts per conversation, for every conversation the user holds
    /// a receipt for. Receipt-less conversations are the caller's to combine
    /// with the conversation listing (everything there is unread).
    pub async fn get_unread_counts(state: &AppState, user_id: &str) -> HashMap<Uuid, i64> {
        let watermarks: Vec<(Uuid, DateTime<Utc>)> = {
            let receipts = state.store.read_receipts.read().await;
            receipts
                .values()
                .filter(|r| r.user_id == user_id)
                .map(|r| (r.conversation_id, r.last_read_time))
                .collect()
        };

        let messages = state.store.messages.read().await;
        watermarks
            .into_iter()
            .map(|(conversation_id, watermark)| {
                let unread = Self::count_unread(
                    messages.conversation_messages(conversation_id).as_slice(),
                    user_id,
                    Some(watermark),
                );
                (conversation_id, unread)
            })
            .collect()
    }

    fn count_unread(
        messages: &[&crate::models::Message],
        user_id: &str,
        watermark: Option<DateTime<Utc>>,
    ) -> i64 {
        messages
            .iter()
            .filter(|m| m.sender_id != user_id)
            .filter(|m| watermark.map_or(true, |w| m.created_at > w))
            .count() as i64
    }

    pub fn watch_unread_count(
        state: &AppState,
        conversation_id: Uuid,
        user_id: String,
    ) -> LiveQuery<i64> {
        let state_clone = state.clone();
        LiveQuery::spawn(
            state.registry.clone(),
            vec![Topic::Conversation(conversation_id)],
            move || {
                let state = state_clone.clone();
                let user_id = user_id.clone();
                async move { Self::get_unread_count(&state, conversation_id, &user_id).await }
            },
        )
    }

    pub fn watch_unread_counts(
        state: &AppState,
        user_id: String,
    ) -> LiveQuery<HashMap<Uuid, i64>> {
        let state_clone = state.clone();
        let topic_id = user_id.clone();
        LiveQuery::spawn(
            state.registry.clone(),
            vec![Topic::User(topic_id)],
            move || {
                let state = state_clone.clone();
                let user_id = user_id.clone();
                async move { Self::get_unread_counts(&state, &user_id).await }
            },
        )
    }
}
