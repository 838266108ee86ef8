//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{Path, State},
    Json,
};

use crate::backend::{KeyValueBackend, MemoryBackend};
use crate::cache::{CachePolicy, CacheStats, LruCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, EntriesResponse, GetResponse, HealthResponse, KeysRequest,
    RemoveManyResponse, SetRequest, SetResponse, SizeResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Namespaces are not kept between requests. Each request opens an
/// `LruCache` over the shared backend, and every instance adds its activity
/// to the one set of counters held here.
#[derive(Clone)]
pub struct AppState {
    /// Backend shared by every namespace
    backend: Arc<dyn KeyValueBackend>,
    /// Limits applied to each namespace
    policy: CachePolicy,
    /// Counters summed over every namespace
    stats: Arc<Mutex<CacheStats>>,
}

impl AppState {
    /// Creates a new AppState over the given backend.
    pub fn new(backend: Arc<dyn KeyValueBackend>, policy: CachePolicy) -> Self {
        Self {
            backend,
            policy,
            stats: Arc::new(Mutex::new(CacheStats::new())),
        }
    }

    /// Creates a new AppState from configuration, backed by process memory.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Arc::new(MemoryBackend::new()), config.policy()?))
    }

    /// Opens the cache for `namespace`.
    ///
    /// Namespaces the cache rejects surface as `InvalidRequest`.
    pub fn cache(&self, namespace: &str) -> Result<LruCache> {
        LruCache::with_stats(
            self.backend.clone(),
            namespace,
            self.policy,
            self.stats.clone(),
        )
        .map_err(|err| match err {
            CacheError::InvalidConfig(msg) => CacheError::InvalidRequest(msg),
            other => other,
        })
    }

    /// Counters summed over every namespace served so far.
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handler for PUT /ns/:namespace/items
///
/// Stores a key-value pair in the namespace.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let cache = state.cache(&namespace)?;
    let stored = cache.set_item(&req.key, &req.value).await?;

    Ok(Json(SetResponse::new(req.key, stored)))
}

/// Handler for GET /ns/:namespace/items/:key
///
/// Retrieves a value and marks it most recently used.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let cache = state.cache(&namespace)?;
    match cache.get_item(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /ns/:namespace/peek/:key
///
/// Retrieves a value without touching its recency.
pub async fn peek_handler(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let cache = state.cache(&namespace)?;
    match cache.peek(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /ns/:namespace/items/:key
///
/// Deletes a key. Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let cache = state.cache(&namespace)?;
    cache.remove_item(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /ns/:namespace/items
pub async fn get_all_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<EntriesResponse>> {
    let cache = state.cache(&namespace)?;
    let pairs = cache.get_all().await?;

    Ok(Json(EntriesResponse::new(namespace, pairs)))
}

/// Handler for DELETE /ns/:namespace/items
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<RemoveManyResponse>> {
    let cache = state.cache(&namespace)?;
    let removed = cache.clear_all().await?;

    Ok(Json(RemoveManyResponse::new(namespace, removed)))
}

/// Handler for POST /ns/:namespace/multi-get
pub async fn multi_get_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<EntriesResponse>> {
    let cache = state.cache(&namespace)?;
    let pairs = cache.multi_get(&req.keys).await?;

    Ok(Json(EntriesResponse::new(namespace, pairs)))
}

/// Handler for POST /ns/:namespace/multi-remove
pub async fn multi_remove_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<RemoveManyResponse>> {
    let cache = state.cache(&namespace)?;
    let removed = cache.multi_remove(&req.keys).await?;

    Ok(Json(RemoveManyResponse::new(namespace, removed)))
}

/// Handler for GET /ns/:namespace/size
pub async fn size_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<SizeResponse>> {
    let cache = state.cache(&namespace)?;
    let record = cache.record().await?;
    let policy = cache.policy();

    Ok(Json(SizeResponse {
        namespace,
        size: record.footprint(),
        entries: record.len(),
        max_size: policy.max_size(),
        max_entries: policy.max_entries(),
    }))
}

/// Handler for GET /stats
///
/// Returns counters summed over every namespace.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.stats()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
