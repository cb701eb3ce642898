use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Direct,
    Group,
}

/// A direct or group chat. Direct conversations have exactly two
/// participants, fixed at creation, and at most one exists per unordered
/// pair. `last_message_time`/`last_message_preview` are denormalized from
/// the newest message; only the message write path patches them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: Uuid,
    pub kind: ConversationKind,
    pub participant_ids: Vec<String>,
    pub group_name: Option<String>,
    pub group_creator_id: Option<String>,
    pub last_message_time: DateTime<Utc>,
    pub last_message_preview: String,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant_ids.iter().any(|p| p == user_id)
    }

    /// True for the direct conversation joining exactly this unordered pair.
    pub fn is_direct_between(&self, a: &str, b: &str) -> bool {
        self.kind == ConversationKind::Direct
            && self.participant_ids.len() == 2
            && self.has_participant(a)
            && self.has_participant(b)
    }
}
