//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for GET /ns/:namespace/items/:key and the peek endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (PUT /ns/:namespace/items)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Outcome message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// False when the entry was too large to keep
    pub stored: bool,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>, stored: bool) -> Self {
        let key = key.into();
        let message = if stored {
            format!("Key '{}' set successfully", key)
        } else {
            format!("Key '{}' exceeds the cache size budget and was not stored", key)
        };
        Self {
            message,
            key,
            stored,
        }
    }
}

/// Response body for DELETE /ns/:namespace/items/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// One key of a batch read; `value` is null when not cached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: Option<String>,
}

/// Response body for multi-get and GET /ns/:namespace/items
#[derive(Debug, Clone, Serialize)]
pub struct EntriesResponse {
    pub namespace: String,
    pub entries: Vec<EntryResponse>,
}

impl EntriesResponse {
    pub fn new(namespace: impl Into<String>, pairs: Vec<(String, Option<String>)>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: pairs
                .into_iter()
                .map(|(key, value)| EntryResponse { key, value })
                .collect(),
        }
    }
}

/// Response body for multi-remove and DELETE /ns/:namespace/items
#[derive(Debug, Clone, Serialize)]
pub struct RemoveManyResponse {
    pub namespace: String,
    /// Number of cached entries actually removed
    pub removed: usize,
}

impl RemoveManyResponse {
    pub fn new(namespace: impl Into<String>, removed: usize) -> Self {
        Self {
            namespace: namespace.into(),
            removed,
        }
    }
}

/// Response body for GET /ns/:namespace/size
#[derive(Debug, Clone, Serialize)]
pub struct SizeResponse {
    pub namespace: String,
    /// Bytes used in the backend, LRU record included
    pub size: u64,
    /// Entries tracked by the LRU record
    pub entries: usize,
    pub max_size: Option<u64>,
    pub max_entries: Option<usize>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of writes dropped for size
    pub rejections: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from aggregated cache statistics
    pub fn new(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            rejections: stats.rejections,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
