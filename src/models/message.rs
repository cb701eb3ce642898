use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored form of a message. Soft delete keeps the row (and its reactions)
/// but nothing past the flag may ever be rendered again. `sequence_number`
/// is assigned per conversation in append order and is what reads sort by.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: String,
    pub content: String,
    pub is_deleted: bool,
    pub edited_at: Option<DateTime<Utc>>,
    /// emoji -> reactor user ids, e.g. {"👍": ["user_abc", "user_xyz"]}
    pub reactions: HashMap<String, Vec<String>>,
    pub sequence_number: i64,
    pub created_at: DateTime<Utc>,
}

/// Render form of a message as handed to subscribers. A soft-deleted message
/// comes through as a tombstone: flag set, content and reactions blanked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageView {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: String,
    pub content: String,
    pub is_deleted: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub reactions: HashMap<String, Vec<String>>,
    pub sequence_number: i64,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn to_view(&self) -> MessageView {
        let (content, reactions) = if self.is_deleted {
            (String::new(), HashMap::new())
        } else {
            (self.content.clone(), self.reactions.clone())
        };
        MessageView {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id.clone(),
            content,
            is_deleted: self.is_deleted,
            edited_at: self.edited_at,
            reactions,
            sequence_number: self.sequence_number,
            created_at: self.created_at,
        }
    }
}
