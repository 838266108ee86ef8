//! In-Memory Backend
//!
//! A `HashMap` guarded by an async `RwLock`. Each instance is an independent
//! store; share one between caches by wrapping it in an `Arc`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::traits::{BackendError, KeyValueBackend};

// == Memory Backend ==
/// Key-value backend held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of raw records, metadata included.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Drops every record from every namespace.
    pub async fn clear(&self) {
        self.data.write().await.clear();
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get_all_keys(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.data.read().await.keys().cloned().collect())
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        self.data.write().await.remove(key);
        Ok(())
    }

    async fn multi_get(
        &self,
        keys: &[String],
    ) -> Result<Vec<(String, Option<String>)>, BackendError> {
        let data = self.data.read().await;
        Ok(keys
            .iter()
            .map(|key| (key.clone(), data.get(key).cloned()))
            .collect())
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<(), BackendError> {
        let mut data = self.data.write().await;
        for key in keys {
            data.remove(key);
        }
        Ok(())
    }
}
