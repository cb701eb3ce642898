use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ephemeral "X is typing" record. Refreshed while the user types, removed
/// when they stop or send. A record older than the liveness window is
/// logically expired and must not surface, removed or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypingIndicator {
    pub conversation_id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub last_typed_at: DateTime<Utc>,
}
