use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile record synced from the external identity provider. `id` is the
/// provider's stable user identifier and is the key used everywhere else.
/// Deletion is soft: the record stays for message attribution, only the
/// online flag is cleared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_online: bool,
    pub last_seen: DateTime<Utc>,
}
