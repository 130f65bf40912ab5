//! Repository layer over the local key-value store

pub mod redis_store;
pub mod settings;
pub mod storage;
pub mod visitors;

use std::sync::Arc;

use storage::KeyValueStore;

/// Main repository struct holding the shared store
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn KeyValueStore>,
    pub visitors: visitors::VisitorCacheRepository,
    pub settings: settings::SettingsRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            visitors: visitors::VisitorCacheRepository::new(store.clone()),
            settings: settings::SettingsRepository::new(store.clone()),
            store,
        }
    }
}
