//! Backend Port
//!
//! Abstract asynchronous key-value store consumed by the cache.

use async_trait::async_trait;
use thiserror::Error;

// == Backend Error ==
/// Failure reported by a key-value backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be reached
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// A read or write failed inside the backend
    #[error("Backend I/O error: {0}")]
    Io(String),
}

// == Key-Value Backend ==
/// String-keyed, string-valued asynchronous store.
///
/// Implementations carry their own durability and atomicity guarantees; the
/// cache treats them as a non-transactional map and propagates every error
/// unchanged.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Lists every key held by the backend, across all namespaces.
    async fn get_all_keys(&self) -> Result<Vec<String>, BackendError>;

    async fn get_item(&self, key: &str) -> Result<Option<String>, BackendError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), BackendError>;

    /// Reads several keys at once, preserving input order.
    async fn multi_get(
        &self,
        keys: &[String],
    ) -> Result<Vec<(String, Option<String>)>, BackendError>;

    async fn multi_remove(&self, keys: &[String]) -> Result<(), BackendError>;
}
