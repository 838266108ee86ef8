//! Metadata Module
//!
//! The per-namespace LRU record and the store that persists it as a single
//! backend entry.
//!
//! The record is encoded as
//! `{"v":1,"lru":[["key",size],...],"size":N}`. Because the
//! record lives in the same backend as the values it describes, its encoded
//! length counts against the size budget. The record keeps that length up to
//! date on every mutation instead of re-encoding itself to measure it.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::backend::KeyValueBackend;
use crate::cache::keys;
use crate::error::{CacheError, Result};

/// Current encoding version of the LRU record.
pub const RECORD_VERSION: u32 = 1;

/// Bytes of `{"v":` + `,"lru":[` + `],"size":` + `}`.
const FIXED_ENCODED_LEN: usize = 5 + 8 + 9 + 1;

// == LRU Record ==
/// Access order and cumulative size of one namespace's entries.
///
/// `order` is oldest-first: the front is the next eviction candidate and
/// every insert or touch moves a key to the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LruRecord {
    #[serde(rename = "v")]
    version: u32,
    #[serde(rename = "lru")]
    order: VecDeque<(String, u64)>,
    #[serde(rename = "size")]
    total_size: u64,
    /// Encoded bytes of every `["key",size]` element, separators excluded
    #[serde(skip)]
    entries_len: usize,
}

impl Default for LruRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl LruRecord {
    // == Constructor ==
    /// Creates an empty record.
    pub fn new() -> Self {
        Self {
            version: RECORD_VERSION,
            order: VecDeque::new(),
            total_size: 0,
            entries_len: 0,
        }
    }

    // == Decode ==
    /// Parses a stored record, rejecting unknown versions.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut record: LruRecord = serde_json::from_str(raw)?;
        if record.version != RECORD_VERSION {
            return Err(CacheError::MetadataVersion(record.version));
        }
        record.recount()?;
        Ok(record)
    }

    // == Encode ==
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds the derived counters from `order` after decoding.
    ///
    /// Fails when the entry sizes cannot be summed without overflow.
    fn recount(&mut self) -> Result<()> {
        let sum = self
            .order
            .iter()
            .try_fold(0u64, |acc, (_, size)| acc.checked_add(*size))
            .ok_or_else(|| {
                CacheError::Metadata(serde::de::Error::custom(
                    "LRU record entry sizes overflow",
                ))
            })?;
        if sum != self.total_size {
            warn!(
                stored = self.total_size,
                actual = sum,
                "LRU record total size out of sync, using sum of entries"
            );
            self.total_size = sum;
        }
        self.entries_len = self
            .order
            .iter()
            .map(|(key, size)| entry_encoded_len(key, *size))
            .sum();
        Ok(())
    }

    // == Encoded Length ==
    /// Byte length `to_json` produces for the current record.
    pub fn encoded_len(&self) -> usize {
        FIXED_ENCODED_LEN
            + decimal_len(u64::from(self.version))
            + decimal_len(self.total_size)
            + self.entries_len
            + self.order.len().saturating_sub(1)
    }

    // == Insert ==
    /// Appends `key` as most recently used, replacing any prior entry.
    pub fn insert(&mut self, key: &str, size: u64) {
        self.remove(key);
        self.entries_len += entry_encoded_len(key, size);
        self.total_size += size;
        self.order.push_back((key.to_string(), size));
    }

    // == Touch ==
    /// Moves `key` to the most recently used position.
    ///
    /// Returns true only when the order actually changed.
    pub fn touch(&mut self, key: &str) -> bool {
        let Some(pos) = self.position(key) else {
            return false;
        };
        if pos + 1 == self.order.len() {
            return false;
        }
        if let Some(entry) = self.order.remove(pos) {
            self.order.push_back(entry);
        }
        true
    }

    // == Remove ==
    /// Removes `key`, returning its recorded size if it was tracked.
    pub fn remove(&mut self, key: &str) -> Option<u64> {
        let pos = self.position(key)?;
        let (key, size) = self.order.remove(pos)?;
        self.forget(&key, size);
        Some(size)
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used entry.
    pub fn pop_oldest(&mut self) -> Option<(String, u64)> {
        let (key, size) = self.order.pop_front()?;
        self.forget(&key, size);
        Some((key, size))
    }

    fn forget(&mut self, key: &str, size: u64) {
        self.entries_len -= entry_encoded_len(key, size);
        self.total_size -= size;
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|(k, _)| k == key)
    }

    /// Sum of the content sizes of every tracked entry.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Content plus the record's own encoded length.
    pub fn footprint(&self) -> u64 {
        self.total_size + self.encoded_len() as u64
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Tracked keys, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|(k, _)| k.as_str())
    }

    #[cfg(test)]
    pub(crate) fn peek_oldest(&self) -> Option<&str> {
        self.order.front().map(|(k, _)| k.as_str())
    }
}

// == Encoding Arithmetic ==
/// Bytes of `["key",size]`.
fn entry_encoded_len(key: &str, size: u64) -> usize {
    json_string_len(key) + decimal_len(size) + 3
}

/// Bytes of `n` written in base ten.
fn decimal_len(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Bytes of `s` as a quoted JSON string, following serde_json's escaping.
fn json_string_len(s: &str) -> usize {
    let escaped: usize = s
        .bytes()
        .map(|b| match b {
            b'"' | b'\\' | b'\n' | b'\r' | b'\t' | 0x08 | 0x0c => 2,
            0x00..=0x1f => 6,
            _ => 1,
        })
        .sum();
    escaped + 2
}

// == Metadata Store ==
/// Loads and saves one namespace's LRU record.
#[derive(Clone)]
pub struct MetadataStore {
    backend: Arc<dyn KeyValueBackend>,
    key: String,
}

impl MetadataStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>, namespace: &str) -> Self {
        Self {
            backend,
            key: keys::metadata_key(namespace),
        }
    }

    // == Load ==
    /// Fetches the record, or an empty one if the namespace has none yet.
    pub async fn load(&self) -> Result<LruRecord> {
        match self.backend.get_item(&self.key).await? {
            Some(raw) => LruRecord::from_json(&raw),
            None => Ok(LruRecord::new()),
        }
    }

    // == Save ==
    /// Overwrites the stored record.
    pub async fn save(&self, record: &LruRecord) -> Result<()> {
        let raw = record.to_json()?;
        self.backend.set_item(&self.key, &raw).await?;
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn assert_len_exact(record: &LruRecord) {
        assert_eq!(record.encoded_len(), record.to_json().unwrap().len());
    }

    #[test]
    fn test_empty_record_encoding() {
        let record = LruRecord::new();
        let json = record.to_json().unwrap();
        assert_eq!(json, r#"{"v":1,"lru":[],"size":0}"#);
        assert_eq!(record.encoded_len(), json.len());
    }

    #[test]
    fn test_insert_appends_and_sums() {
        let mut record = LruRecord::new();
        record.insert("a", 10);
        record.insert("b", 25);

        assert_eq!(record.len(), 2);
        assert_eq!(record.total_size(), 35);
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"v":1,"lru":[["a",10],["b",25]],"size":35}"#
        );
        assert_len_exact(&record);
    }

    #[test]
    fn test_insert_existing_key_replaces_entry() {
        let mut record = LruRecord::new();
        record.insert("a", 10);
        record.insert("b", 20);
        record.insert("a", 5);

        assert_eq!(record.len(), 2);
        assert_eq!(record.total_size(), 25);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_len_exact(&record);
    }

    #[test]
    fn test_touch_moves_to_back() {
        let mut record = LruRecord::new();
        record.insert("a", 1);
        record.insert("b", 1);
        record.insert("c", 1);

        assert!(record.touch("a"));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "c", "a"]);
        assert_eq!(record.peek_oldest(), Some("b"));
    }

    #[test]
    fn test_touch_newest_or_missing_is_unchanged() {
        let mut record = LruRecord::new();
        record.insert("a", 1);
        record.insert("b", 1);

        assert!(!record.touch("b"));
        assert!(!record.touch("missing"));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove() {
        let mut record = LruRecord::new();
        record.insert("a", 7);
        record.insert("b", 3);

        assert_eq!(record.remove("a"), Some(7));
        assert_eq!(record.remove("a"), None);
        assert_eq!(record.total_size(), 3);
        assert!(!record.contains("a"));
        assert_len_exact(&record);
    }

    #[test]
    fn test_pop_oldest() {
        let mut record = LruRecord::new();
        record.insert("a", 7);
        record.insert("b", 3);

        assert_eq!(record.pop_oldest(), Some(("a".to_string(), 7)));
        assert_eq!(record.pop_oldest(), Some(("b".to_string(), 3)));
        assert_eq!(record.pop_oldest(), None);
        assert_eq!(record, LruRecord::new());
    }

    #[test]
    fn test_encoded_len_with_escapes_and_unicode() {
        let mut record = LruRecord::new();
        for key in ["quote\"d", "back\\slash", "tab\tnew\nline", "bell\u{7}", "ünï", "del\u{7f}"] {
            record.insert(key, 1_000_000);
            assert_len_exact(&record);
        }
        record.remove("ünï");
        assert_len_exact(&record);
    }

    #[test]
    fn test_encoded_len_tracks_total_digits() {
        let mut record = LruRecord::new();
        record.insert("a", 9);
        assert_len_exact(&record);
        record.insert("b", 1);
        assert_len_exact(&record);
        record.pop_oldest();
        assert_len_exact(&record);
    }

    #[test]
    fn test_decode_roundtrip_restores_counters() {
        let mut record = LruRecord::new();
        record.insert("x", 12);
        record.insert("y", 345);

        let decoded = LruRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.encoded_len(), record.encoded_len());
    }

    #[test]
    fn test_decode_repairs_total_size() {
        let decoded =
            LruRecord::from_json(r#"{"v":1,"lru":[["a",4],["b",6]],"size":99}"#)
                .unwrap();
        assert_eq!(decoded.total_size(), 10);
        assert_len_exact(&decoded);
    }

    #[test]
    fn test_decode_rejects_overflowing_sizes() {
        let raw = format!(r#"{{"v":1,"lru":[["a",{}],["b",1]],"size":0}}"#, u64::MAX);
        let result = LruRecord::from_json(&raw);
        assert!(matches!(result, Err(CacheError::Metadata(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let result = LruRecord::from_json(r#"{"v":2,"lru":[],"size":0}"#);
        assert!(matches!(result, Err(CacheError::MetadataVersion(2))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = LruRecord::from_json("not json");
        assert!(matches!(result, Err(CacheError::Metadata(_))));
    }

    #[test]
    fn test_json_string_len_matches_serde() {
        let samples = ["", "plain", "\"", "\\", "\u{0}", "\u{1f}", "\u{8}\u{c}", "日本語", "🦀"];
        for s in samples {
            assert_eq!(json_string_len(s), serde_json::to_string(s).unwrap().len(), "{:?}", s);
        }
    }

    #[test]
    fn test_decimal_len() {
        assert_eq!(decimal_len(0), 1);
        assert_eq!(decimal_len(9), 1);
        assert_eq!(decimal_len(10), 2);
        assert_eq!(decimal_len(u64::MAX), 20);
    }

    #[tokio::test]
    async fn test_store_load_absent_is_empty() {
        let store = MetadataStore::new(Arc::new(MemoryBackend::new()), "ns");
        let record = store.load().await.unwrap();
        assert!(record.is_empty());
        assert_eq!(record.encoded_len(), LruRecord::new().to_json().unwrap().len());
    }

    #[tokio::test]
    async fn test_store_save_and_load() {
        let backend = Arc::new(MemoryBackend::new());
        let store = MetadataStore::new(backend.clone(), "ns");

        let mut record = LruRecord::new();
        record.insert("k", 42);
        store.save(&record).await.unwrap();

        let raw = backend.get_item("ns:_metadata").await.unwrap().unwrap();
        assert_eq!(raw.len(), record.encoded_len());
        assert_eq!(store.load().await.unwrap(), record);
    }
}
