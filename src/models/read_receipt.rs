use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per (conversation, user) read watermark. At most one exists per pair;
/// it is patched in place and never moves backwards. Unread count = messages
/// from other senders created strictly after `last_read_time`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadReceipt {
    pub conversation_id: Uuid,
    pub user_id: String,
    pub last_read_time: DateTime<Utc>,
}
