use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use uuid::Uuid;

pub mod events;
pub mod query;

pub use events::ChangeEvent;
pub use query::LiveQuery;

/// Routing key for change notifications. Mutations publish to every topic
/// they affect; a subscription names the topics its query reads from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Everything scoped to one conversation: messages, reactions, typing,
    /// receipts, summary patches.
    Conversation(Uuid),
    /// Everything that changes what one user sees across conversations:
    /// conversation list entries, unread counts, their own profile.
    User(String),
    /// The whole user directory.
    Directory,
}

#[derive(Default, Clone)]
pub struct SubscriberRegistry {
    // topic -> list of channel senders
    inner: Arc<RwLock<HashMap<Topic, Vec<UnboundedSender<ChangeEvent>>>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for a set of topics. The receiver sees every
    /// event published to any of them; it is dropped from the registry once
    /// the receiving side goes away.
    pub async fn subscribe(&self, topics: Vec<Topic>) -> UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = unbounded_channel();
        let mut guard = self.inner.write().await;
        for topic in topics {
            guard.entry(topic).or_default().push(tx.clone());
        }
        rx
    }

    pub async fn publish(&self, topics: &[Topic], event: ChangeEvent) {
        tracing::debug!(event = event.event_type(), "publish change event");
        let mut guard = self.inner.write().await;
        for topic in topics {
            if let Some(list) = guard.get_mut(topic) {
                list.retain(|sender| sender.send(event.clone()).is_ok());
            }
        }
    }
}
