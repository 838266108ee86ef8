//! Cache Store Module
//!
//! Namespaced LRU cache over a shared key-value backend.
//!
//! Every call re-reads the namespace's LRU record from the backend, applies
//! its change, and writes the record back at most once. Nothing about the
//! cached contents is kept in process memory between calls, so concurrent
//! writers to one namespace race on the record and the last save wins.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::backend::KeyValueBackend;
use crate::cache::{keys, lru, CachePolicy, CacheStats, LruRecord, MetadataStore, SEPARATOR};
use crate::error::{CacheError, Result};

// == LRU Cache ==
/// Bounded cache scoped to one namespace of a key-value backend.
pub struct LruCache {
    /// Shared backend holding values and the LRU record
    backend: Arc<dyn KeyValueBackend>,
    /// Prefix isolating this cache's keys
    namespace: String,
    /// Entry-count and byte limits
    policy: CachePolicy,
    /// Persistence of the LRU record
    metadata: MetadataStore,
    /// Activity counters, possibly shared with other instances
    stats: Arc<Mutex<CacheStats>>,
}

impl LruCache {
    // == Constructor ==
    /// Creates a cache over `backend` scoped to `namespace`.
    ///
    /// # Errors
    /// `InvalidConfig` if the namespace is empty or contains the key
    /// separator.
    pub fn new(
        backend: Arc<dyn KeyValueBackend>,
        namespace: impl Into<String>,
        policy: CachePolicy,
    ) -> Result<Self> {
        Self::with_stats(
            backend,
            namespace,
            policy,
            Arc::new(Mutex::new(CacheStats::new())),
        )
    }

    /// Creates a cache whose counters accumulate into `stats`.
    pub fn with_stats(
        backend: Arc<dyn KeyValueBackend>,
        namespace: impl Into<String>,
        policy: CachePolicy,
        stats: Arc<Mutex<CacheStats>>,
    ) -> Result<Self> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(CacheError::InvalidConfig(
                "namespace must not be empty".to_string(),
            ));
        }
        // "a" would otherwise list and clear the keys of "a:b"
        if namespace.contains(SEPARATOR) {
            return Err(CacheError::InvalidConfig(format!(
                "namespace must not contain '{}': {}",
                SEPARATOR, namespace
            )));
        }

        Ok(Self {
            metadata: MetadataStore::new(backend.clone(), &namespace),
            backend,
            namespace,
            policy,
            stats,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Snapshot of this instance's activity counters.
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_stats(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *stats);
    }

    fn composite_keys(&self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .map(|key| keys::compose(&self.namespace, key))
            .collect()
    }

    // == Set ==
    /// Stores `value` under `key` as the most recently used entry.
    ///
    /// The entry's size is the byte length of its composite key plus the
    /// value. An entry larger than the whole size budget is dropped without
    /// error. Otherwise least recently used entries are evicted until the
    /// namespace fits its policy; if the new entry itself does not survive,
    /// its value is not written.
    ///
    /// Returns whether the value was written.
    ///
    /// # Errors
    /// `IllegalKey` if `key` is the reserved metadata key, checked before
    /// any backend access.
    pub async fn set_item(&self, key: &str, value: &str) -> Result<bool> {
        if keys::is_reserved(key) {
            return Err(CacheError::IllegalKey(key.to_string()));
        }

        let composite = keys::compose(&self.namespace, key);
        let size = (composite.len() + value.len()) as u64;
        if !self.policy.admits(size) {
            warn!(
                namespace = %self.namespace,
                key,
                size,
                "Entry exceeds size budget, not caching"
            );
            self.update_stats(CacheStats::record_rejection);
            return Ok(false);
        }

        let mut record = self.metadata.load().await?;
        record.insert(key, size);
        let evicted = lru::enforce(&mut record, &self.policy);
        self.metadata.save(&record).await?;

        let survived = !evicted.iter().any(|k| k == key);
        if !evicted.is_empty() {
            info!(
                namespace = %self.namespace,
                count = evicted.len(),
                "Evicted least recently used entries"
            );
            self.backend
                .multi_remove(&self.composite_keys(&evicted))
                .await?;
            self.update_stats(|s| s.record_evictions(evicted.len() as u64));
        }

        if survived {
            self.backend.set_item(&composite, value).await?;
            debug!(namespace = %self.namespace, key, size, "Stored entry");
        }
        Ok(survived)
    }

    // == Get ==
    /// Reads `key` and marks it most recently used.
    ///
    /// Returns `None` whether the key was never stored, evicted, or
    /// rejected for size.
    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let Some(value) = self.peek(key).await? else {
            self.update_stats(|s| s.record_misses(1));
            return Ok(None);
        };

        let mut record = self.metadata.load().await?;
        if record.touch(key) {
            self.metadata.save(&record).await?;
        }
        self.update_stats(|s| s.record_hits(1));
        Ok(Some(value))
    }

    // == Peek ==
    /// Reads `key` without affecting recency.
    pub async fn peek(&self, key: &str) -> Result<Option<String>> {
        if keys::is_reserved(key) {
            return Ok(None);
        }
        let composite = keys::compose(&self.namespace, key);
        Ok(self.backend.get_item(&composite).await?)
    }

    // == Remove ==
    /// Deletes `key`. Removing an absent key is a no-op.
    pub async fn remove_item(&self, key: &str) -> Result<()> {
        if keys::is_reserved(key) {
            return Ok(());
        }
        let mut record = self.metadata.load().await?;
        if record.remove(key).is_some() {
            self.metadata.save(&record).await?;
        }
        let composite = keys::compose(&self.namespace, key);
        self.backend.remove_item(&composite).await?;
        debug!(namespace = %self.namespace, key, "Removed entry");
        Ok(())
    }

    // == Multi Get ==
    /// Reads several keys, refreshing all of their recency in one metadata
    /// update. Pairs come back in input order.
    pub async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>> {
        let mut record = self.metadata.load().await?;
        let mut changed = false;
        for key in keys {
            changed |= record.touch(key);
        }
        if changed {
            self.metadata.save(&record).await?;
        }

        let values = self.backend.multi_get(&self.composite_keys(keys)).await?;
        let pairs: Vec<(String, Option<String>)> = keys
            .iter()
            .cloned()
            .zip(values.into_iter().map(|(_, value)| value))
            .map(|(key, value)| {
                let value = if keys::is_reserved(&key) { None } else { value };
                (key, value)
            })
            .collect();

        let hits = pairs.iter().filter(|(_, v)| v.is_some()).count() as u64;
        self.update_stats(|s| {
            s.record_hits(hits);
            s.record_misses(pairs.len() as u64 - hits);
        });
        Ok(pairs)
    }

    // == Multi Remove ==
    /// Deletes several keys with one metadata update and one backend call.
    ///
    /// Returns how many of them were tracked by the LRU record.
    pub async fn multi_remove(&self, keys: &[String]) -> Result<usize> {
        let keys: Vec<String> = keys
            .iter()
            .filter(|key| !keys::is_reserved(key))
            .cloned()
            .collect();
        let record = self.metadata.load().await?;
        self.remove_tracked(record, &keys).await
    }

    async fn remove_tracked(&self, mut record: LruRecord, keys: &[String]) -> Result<usize> {
        let removed = keys
            .iter()
            .filter(|key| record.remove(key).is_some())
            .count();
        if removed > 0 {
            self.metadata.save(&record).await?;
        }
        if !keys.is_empty() {
            self.backend.multi_remove(&self.composite_keys(keys)).await?;
        }
        debug!(namespace = %self.namespace, removed, "Removed entries");
        Ok(removed)
    }

    // == Get All Keys ==
    /// Lists the logical keys stored in this namespace.
    pub async fn get_all_keys(&self) -> Result<Vec<String>> {
        let all = self.backend.get_all_keys().await?;
        Ok(all
            .iter()
            .filter_map(|composite| keys::decompose(&self.namespace, composite))
            .filter(|key| !keys::is_reserved(key))
            .map(str::to_string)
            .collect())
    }

    // == Get All ==
    /// Reads every entry in this namespace, refreshing their recency.
    pub async fn get_all(&self) -> Result<Vec<(String, Option<String>)>> {
        let keys = self.get_all_keys().await?;
        self.multi_get(&keys).await
    }

    // == Clear All ==
    /// Removes every entry in this namespace.
    ///
    /// Keys still tracked by the LRU record but missing from the backend are
    /// dropped as well, leaving an empty record. Returns the number of
    /// values deleted from the backend.
    pub async fn clear_all(&self) -> Result<usize> {
        let mut keys = self.get_all_keys().await?;
        let stored_count = keys.len();
        let record = self.metadata.load().await?;

        let stale: Vec<String> = {
            let stored: HashSet<&str> = keys.iter().map(String::as_str).collect();
            record
                .keys()
                .filter(|key| !stored.contains(key))
                .map(str::to_string)
                .collect()
        };
        keys.extend(stale);

        self.remove_tracked(record, &keys).await?;
        Ok(stored_count)
    }

    // == Get Size ==
    /// Bytes this namespace occupies in the backend, LRU record included.
    pub async fn get_size(&self) -> Result<u64> {
        let record = self.metadata.load().await?;
        Ok(record.footprint())
    }

    /// Current LRU record of this namespace.
    pub async fn record(&self) -> Result<LruRecord> {
        self.metadata.load().await
    }

    /// Number of entries tracked by the LRU record.
    pub async fn len(&self) -> Result<usize> {
        Ok(self.record().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
