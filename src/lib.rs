//! LRU KV - Namespaced LRU cache over an asynchronous key-value backend
//!
//! Bounds each namespace by entry count and/or total bytes, counting the
//! namespace's own bookkeeping record against the byte budget.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use backend::{BackendError, KeyValueBackend, MemoryBackend};
pub use cache::{CachePolicy, LruCache};
pub use config::Config;
pub use error::{CacheError, Result};
