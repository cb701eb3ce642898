use chrono::Utc;

use crate::error::AppResult;
use crate::live::{ChangeEvent, LiveQuery, Topic};
use crate::models::User;
use crate::state::AppState;

pub struct UserService;

impl UserService {
    /// Create or refresh a profile from an identity-provider sync event.
    /// Runs on provider webhooks and on every session start, so it doubles
    /// as the "I'm online" signal. Idempotent; returns the user id.
    pub async fn upsert_user(
        state: &AppState,
        id: &str,
        name: &str,
        email: &str,
        avatar_url: Option<String>,
    ) -> AppResult<String> {
        let now = Utc::now();
        {
            let mut users = state.store.users.write().await;
            match users.get_mut(id) {
                Some(user) => {
                    // Keep the record, refresh profile fields and presence
                    user.name = name.to_string();
                    user.email = email.to_string();
                    user.avatar_url = avatar_url;
                    user.is_online = true;
                    user.last_seen = now;
                }
                None => {
                    users.insert(
                        id.to_string(),
                        User {
                            id: id.to_string(),
                            name: name.to_string(),
                            email: email.to_string(),
                            avatar_url,
                            is_online: true,
                            last_seen: now,
                        },
                    );
                }
            }
        }

        tracing::debug!(user_id = %id, "user profile upserted");
        state
            .registry
            .publish(
                &[Topic::Directory, Topic::User(id.to_string())],
                ChangeEvent::UserUpserted {
                    user_id: id.to_string(),
                },
            )
            .await;
        Ok(id.to_string())
    }

    /// Presence signal from the hosting application (visibility/focus
    /// changes, unmount). Best-effort: an unknown user is a no-op.
    pub async fn set_online_status(state: &AppState, id: &str, is_online: bool) -> AppResult<()> {
        let updated = {
            let mut users = state.store.users.write().await;
            match users.get_mut(id) {
                Some(user) => {
                    user.is_online = is_online;
                    user.last_seen = Utc::now();
                    true
                }
                None => false,
            }
        };

        if updated {
            state
                .registry
                .publish(
                    &[Topic::Directory, Topic::User(id.to_string())],
                    ChangeEvent::PresenceChanged {
                        user_id: id.to_string(),
                        is_online,
                    },
                )
                .await;
        }
        Ok(())
    }

    /// Identity-provider delete event. The record is kept so old messages
    /// still resolve a name; only presence is cleared.
    pub async fn mark_offline(state: &AppState, id: &str) -> AppResult<()> {
        Self::set_online_status(state, id, false).await
    }

    pub async fn get_user(state: &AppState, id: &str) -> Option<User> {
        state.store.users.read().await.get(id).cloned()
    }

    pub async fn get_user_by_email(state: &AppState, email: &str) -> Option<User> {
        state
            .store
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Batch lookup. Missing ids are skipped, input order is preserved.
    pub async fn get_users(state: &AppState, ids: &[String]) -> Vec<User> {
        let users = state.store.users.read().await;
        ids.iter().filter_map(|id| users.get(id).cloned()).collect()
    }

    /// Directory listing for the "people" view: everyone except the caller,
    /// optionally filtered by a case-insensitive name/email search, online
    /// users first, then by name.
    pub async fn list_users(
        state: &AppState,
        excluding_id: &str,
        search: Option<&str>,
    ) -> Vec<User> {
        let needle = search.map(|s| s.to_lowercase());
        let users = state.store.users.read().await;
        let mut out: Vec<User> = users
            .values()
            .filter(|u| u.id != excluding_id)
            .filter(|u| match &needle {
                Some(needle) => {
                    u.name.to_lowercase().contains(needle)
                        || u.email.to_lowercase().contains(needle)
                }
                None => true,
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.is_online.cmp(&a.is_online).then_with(|| a.name.cmp(&b.name)));
        out
    }

    pub fn watch_user(state: &AppState, id: String) -> LiveQuery<Option<User>> {
        let state_clone = state.clone();
        let topic_id = id.clone();
        LiveQuery::spawn(
            state.registry.clone(),
            vec![Topic::User(topic_id)],
            move || {
                let state = state_clone.clone();
                let id = id.clone();
                async move { Self::get_user(&state, &id).await }
            },
        )
    }

    pub fn watch_directory(
        state: &AppState,
        excluding_id: String,
        search: Option<String>,
    ) -> LiveQuery<Vec<User>> {
        let state_clone = state.clone();
        LiveQuery::spawn(state.registry.clone(), vec![Topic::Directory], move || {
            let state = state_clone.clone();
            let excluding_id = excluding_id.clone();
            let search = search.clone();
            async move { Self::list_users(&state, &excluding_id, search.as_deref()).await }
        })
    }
}
