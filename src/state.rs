use std::sync::Arc;

use crate::{config::Config, live::SubscriberRegistry, store::Store};

/// Shared handle threaded through every operation.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub registry: SubscriberRegistry,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(Store::new()),
            registry: SubscriberRegistry::new(),
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
