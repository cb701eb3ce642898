//! Change notifications pushed to live-query subscribers.
//!
//! Every mutation in the store maps to exactly one event variant. Wire names
//! follow the flat "object.action" convention and every event carries the
//! entity ids a subscriber needs to decide relevance; payload data is not
//! embedded because subscribers re-evaluate their query instead of patching
//! state from events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ChangeEvent {
    /// Conversation inserted (first direct contact or explicit group create)
    #[serde(rename = "conversation.created")]
    ConversationCreated { conversation_id: Uuid },

    /// Denormalized summary fields patched (newest message changed)
    #[serde(rename = "conversation.updated")]
    ConversationUpdated { conversation_id: Uuid },

    /// New message appended
    #[serde(rename = "message.new")]
    MessageNew {
        conversation_id: Uuid,
        message_id: Uuid,
    },

    /// Message content edited by its sender
    #[serde(rename = "message.edited")]
    MessageEdited {
        conversation_id: Uuid,
        message_id: Uuid,
    },

    /// Message soft-deleted
    #[serde(rename = "message.deleted")]
    MessageDeleted {
        conversation_id: Uuid,
        message_id: Uuid,
    },

    /// Reaction membership flipped for one (message, user, emoji)
    #[serde(rename = "reaction.toggled")]
    ReactionToggled {
        conversation_id: Uuid,
        message_id: Uuid,
        emoji: String,
    },

    /// Read watermark advanced
    #[serde(rename = "receipt.advanced")]
    ReceiptAdvanced {
        conversation_id: Uuid,
        user_id: String,
    },

    /// Typing record created, refreshed or removed
    #[serde(rename = "typing.changed")]
    TypingChanged { conversation_id: Uuid },

    /// Profile created or patched from an identity sync
    #[serde(rename = "user.upserted")]
    UserUpserted { user_id: String },

    /// Online flag flipped
    #[serde(rename = "presence.changed")]
    PresenceChanged { user_id: String, is_online: bool },
}

impl ChangeEvent {
    /// Get event type as string (e.g., "message.new")
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ConversationCreated { .. } => "conversation.created",
            Self::ConversationUpdated { .. } => "conversation.updated",
            Self::MessageNew { .. } => "message.new",
            Self::MessageEdited { .. } => "message.edited",
            Self::MessageDeleted { .. } => "message.deleted",
            Self::ReactionToggled { .. } => "reaction.toggled",
            Self::ReceiptAdvanced { .. } => "receipt.advanced",
            Self::TypingChanged { .. } => "typing.changed",
            Self::UserUpserted { .. } => "user.upserted",
            Self::PresenceChanged { .. } => "presence.changed",
        }
    }
}
