//! Local visitor cache (newest first)

use std::sync::Arc;
use tokio::sync::Mutex;

use super::storage::KeyValueStore;
use crate::{
    error::{AppError, AppResult},
    models::visitor::VisitorRecord,
};

/// Entry holding the JSON array of cached visitors
pub const VISITORS_KEY: &str = "library_visitors";

#[derive(Clone)]
pub struct VisitorCacheRepository {
    store: Arc<dyn KeyValueStore>,
    // Serializes the read-modify-write in `append`
    write_lock: Arc<Mutex<()>>,
}

enum Cached {
    Missing,
    Records(Vec<VisitorRecord>),
    Unreadable,
}

impl VisitorCacheRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn read(&self) -> Cached {
        match self.store.get(VISITORS_KEY).await {
            Ok(None) => Cached::Missing,
            Ok(Some(raw)) => match serde_json::from_str::<Vec<VisitorRecord>>(&raw) {
                Ok(records) => Cached::Records(records),
                Err(e) => {
                    tracing::warn!("Local visitor cache is malformed: {}", e);
                    Cached::Unreadable
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read local visitor cache: {}", e);
                Cached::Unreadable
            }
        }
    }

    /// Cached visitors, newest first; empty when absent or unreadable
    pub async fn load(&self) -> Vec<VisitorRecord> {
        match self.read().await {
            Cached::Records(records) => records,
            Cached::Missing | Cached::Unreadable => Vec::new(),
        }
    }

    /// Put a record at the front of the cache.
    ///
    /// Never fails: persistence problems are logged so a check-in is never
    /// blocked by the local disk. An unreadable cache is left as is rather
    /// than overwritten.
    pub async fn append(&self, record: &VisitorRecord) {
        let _guard = self.write_lock.lock().await;

        let mut records = match self.read().await {
            Cached::Missing => Vec::new(),
            Cached::Records(records) => records,
            Cached::Unreadable => {
                tracing::error!(
                    "Skipping local save of visitor {}: existing cache cannot be read",
                    record.id
                );
                return;
            }
        };
        records.insert(0, record.clone());

        let payload = match serde_json::to_string(&records) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize visitor cache: {}", e);
                return;
            }
        };

        match self.store.set(VISITORS_KEY, &payload).await {
            Ok(()) => tracing::debug!(
                "Saved visitor {} locally ({} cached)",
                record.id,
                records.len()
            ),
            Err(e) => tracing::error!("Local storage error while saving visitor {}: {}", record.id, e),
        }
    }

    /// Wipe the local cache; the remote sheet is never touched
    pub async fn clear(&self, confirmed: bool) -> AppResult<()> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired(
                "Clearing the local visitor cache must be confirmed (confirm=true). The Google Sheet is not affected."
                    .to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        self.store.remove(VISITORS_KEY).await?;
        tracing::info!("Local visitor cache cleared");
        Ok(())
    }

    /// Look up a cached visitor by id
    pub async fn find(&self, id: &str) -> Option<VisitorRecord> {
        self.load().await.into_iter().find(|v| v.id == id)
    }
}
