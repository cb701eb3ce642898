use chrono::Utc;
use uuid::Uuid;

use crate::error::AppResult;
use crate::live::{ChangeEvent, LiveQuery, Topic};
use crate::models::TypingIndicator;
use crate::state::AppState;

pub struct TypingService;

impl TypingService {
    /// `is_typing = true` refreshes the liveness record (creating it with
    /// the given display name if absent); `false` removes it. Expiry is not
    /// handled here — reads filter on the liveness window.
    pub async fn set_typing(
        state: &AppState,
        conversation_id: Uuid,
        user_id: &str,
        user_name: &str,
        is_typing: bool,
    ) -> AppResult<()> {
        let key = (conversation_id, user_id.to_string());
        let changed = {
            let mut typing = state.store.typing.write().await;
            if is_typing {
                let now = Utc::now();
                typing
                    .entry(key)
                    .and_modify(|t| t.last_typed_at = now)
                    .or_insert_with(|| TypingIndicator {
                        conversation_id,
                        user_id: user_id.to_string(),
                        user_name: user_name.to_string(),
                        last_typed_at: now,
                    });
                true
            } else {
                typing.remove(&key).is_some()
            }
        };

        if changed {
            state
                .registry
                .publish(
                    &[Topic::Conversation(conversation_id)],
                    ChangeEvent::TypingChanged { conversation_id },
                )
                .await;
        }
        Ok(())
    }

    /// Who is typing right now, excluding the caller. Records past the
    /// liveness window are invisible whether or not they have been removed
    /// yet. Sorted by display name for stable rendering.
    pub async fn get_typing_users(
        state: &AppState,
        conversation_id: Uuid,
        excluding_user_id: &str,
    ) -> Vec<TypingIndicator> {
        let window = state.config.typing_liveness();
        let now = Utc::now();
        let typing = state.store.typing.read().await;
        let mut out: Vec<TypingIndicator> = typing
            .values()
            .filter(|t| t.conversation_id == conversation_id)
            .filter(|t| t.user_id != excluding_user_id)
            .filter(|t| now - t.last_typed_at < window)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.user_name.cmp(&b.user_name));
        out
    }

    pub fn watch_typing_users(
        state: &AppState,
        conversation_id: Uuid,
        excluding_user_id: String,
    ) -> LiveQuery<Vec<TypingIndicator>> {
        let state_clone = state.clone();
        LiveQuery::spawn(
            state.registry.clone(),
            vec![Topic::Conversation(conversation_id)],
            move || {
                let state = state_clone.clone();
                let excluding_user_id = excluding_user_id.clone();
                async move {
                    Self::get_typing_users(&state, conversation_id, &excluding_user_id).await
                }
            },
        )
    }
}
