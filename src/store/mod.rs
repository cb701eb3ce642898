use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Conversation, Message, ReadReceipt, TypingIndicator, User};

/// Composite key for receipt and typing rows, mirroring the
/// (conversation, user) index the reads go through.
pub type PairKey = (Uuid, String);

/// Message table with its per-conversation append index. The index vector is
/// the authoritative order; `sequence_number` is stamped from a table-wide
/// counter at insert so ordering survives timestamp ties.
#[derive(Default)]
pub struct MessageTable {
    by_id: HashMap<Uuid, Message>,
    by_conversation: HashMap<Uuid, Vec<Uuid>>,
    next_seq: i64,
}

impl MessageTable {
    pub fn insert(&mut self, mut message: Message) -> Uuid {
        self.next_seq += 1;
        message.sequence_number = self.next_seq;
        let id = message.id;
        self.by_conversation
            .entry(message.conversation_id)
            .or_default()
            .push(id);
        self.by_id.insert(id, message);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&Message> {
        self.by_id.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Message> {
        self.by_id.get_mut(id)
    }

    /// All messages of a conversation in append order.
    pub fn conversation_messages(&self, conversation_id: Uuid) -> Vec<&Message> {
        self.by_conversation
            .get(&conversation_id)
            .map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    /// Id of the newest message in a conversation, if any.
    pub fn latest_in_conversation(&self, conversation_id: Uuid) -> Option<Uuid> {
        self.by_conversation
            .get(&conversation_id)
            .and_then(|ids| ids.last())
            .copied()
    }
}

/// In-memory document store standing in for the hosted reactive database.
/// One lock per table; multi-step writes (scan-then-insert, insert-plus-
/// summary-patch) hold the relevant write guard for their whole critical
/// section, which is what gives the single-writer semantics the operations
/// assume.
#[derive(Default)]
pub struct Store {
    pub users: RwLock<HashMap<String, User>>,
    pub conversations: RwLock<HashMap<Uuid, Conversation>>,
    pub messages: RwLock<MessageTable>,
    pub read_receipts: RwLock<HashMap<PairKey, ReadReceipt>>,
    pub typing: RwLock<HashMap<PairKey, TypingIndicator>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
