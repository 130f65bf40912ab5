//! Persisted operator settings

use std::sync::Arc;

use super::storage::KeyValueStore;
use crate::error::AppResult;

/// Entry holding the operator-supplied Apps Script URL
pub const SCRIPT_URL_KEY: &str = "lib_script_url";

#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored override, `None` when unset, blank or unreadable
    pub async fn script_url(&self) -> Option<String> {
        match self.store.get(SCRIPT_URL_KEY).await {
            Ok(value) => value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read script URL setting: {}", e);
                None
            }
        }
    }

    pub async fn set_script_url(&self, url: &str) -> AppResult<()> {
        self.store.set(SCRIPT_URL_KEY, url.trim()).await
    }

    pub async fn clear_script_url(&self) -> AppResult<()> {
        self.store.remove(SCRIPT_URL_KEY).await
    }
}
