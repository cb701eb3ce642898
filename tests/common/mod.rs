#![allow(dead_code)]

use chat_core::services::{ConversationService, UserService};
use chat_core::{AppState, Config};
use uuid::Uuid;

pub fn state() -> AppState {
    AppState::default()
}

pub fn state_with(config: Config) -> AppState {
    AppState::new(config)
}

pub async fn seed_user(state: &AppState, id: &str, name: &str) {
    UserService::upsert_user(state, id, name, &format!("{id}@example.com"), None)
        .await
        .unwrap();
}

pub async fn direct(state: &AppState, a: &str, b: &str) -> Uuid {
    ConversationService::get_or_create_direct(state, a, b)
        .await
        .unwrap()
}
