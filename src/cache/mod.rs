//! Cache Module
//!
//! Namespaced LRU caching over an asynchronous key-value backend, bounded by
//! entry count and/or total bytes.

pub mod keys;
mod lru;
mod metadata;
mod stats;
mod store;


// Re-export public types
pub use lru::{enforce, CachePolicy};
pub use metadata::{LruRecord, MetadataStore, RECORD_VERSION};
pub use stats::CacheStats;
pub use store::LruCache;

// == Public Constants ==
/// Separator between namespace and key in backend keys
pub const SEPARATOR: char = ':';

/// Logical key reserved for the per-namespace LRU record
pub const METADATA_KEY: &str = "_metadata";
