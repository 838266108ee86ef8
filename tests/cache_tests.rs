//! Integration Tests for the Cache Library
//!
//! Exercises `LruCache` through the public API over a shared backend.

use std::sync::Arc;

use lru_kv::cache::{keys, LruRecord};
use lru_kv::{CacheError, CachePolicy, KeyValueBackend, LruCache, MemoryBackend};

fn shared_backend() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::new())
}

#[tokio::test]
async fn test_round_trip() {
    let cache = LruCache::new(shared_backend(), "app", CachePolicy::unbounded()).unwrap();

    cache.set_item("greeting", "hello").await.unwrap();

    assert_eq!(
        cache.get_item("greeting").await.unwrap(),
        Some("hello".to_string())
    );
}

#[tokio::test]
async fn test_max_entries_one_keeps_latest() {
    let policy = CachePolicy::new(Some(1), None).unwrap();
    let cache = LruCache::new(shared_backend(), "app", policy).unwrap();

    cache.set_item("k1", "v1").await.unwrap();
    cache.set_item("k2", "v2").await.unwrap();

    assert_eq!(cache.get_item("k1").await.unwrap(), None);
    assert_eq!(cache.get_item("k2").await.unwrap(), Some("v2".to_string()));
}

#[tokio::test]
async fn test_instances_share_state_through_backend() {
    let backend = shared_backend();
    let policy = CachePolicy::new(Some(2), None).unwrap();
    let writer = LruCache::new(backend.clone(), "app", policy).unwrap();
    let reader = LruCache::new(backend.clone(), "app", policy).unwrap();

    writer.set_item("a", "1").await.unwrap();
    writer.set_item("b", "2").await.unwrap();
    // Recency refreshed through a second instance is seen by the first
    reader.get_item("a").await.unwrap();
    writer.set_item("c", "3").await.unwrap();

    assert_eq!(reader.peek("b").await.unwrap(), None);
    assert_eq!(reader.peek("a").await.unwrap(), Some("1".to_string()));
}

#[tokio::test]
async fn test_reserved_key_leaves_backend_untouched() {
    let backend = shared_backend();
    let cache = LruCache::new(backend.clone(), "app", CachePolicy::unbounded()).unwrap();
    cache.set_item("k", "v").await.unwrap();
    let before = backend.get_item(&keys::metadata_key("app")).await.unwrap();

    let result = cache.set_item("_metadata", "anything").await;

    assert!(matches!(result, Err(CacheError::IllegalKey(_))));
    assert_eq!(
        backend.get_item(&keys::metadata_key("app")).await.unwrap(),
        before
    );
    assert_eq!(backend.len().await, 2);
}

#[tokio::test]
async fn test_size_scenario_from_budget() {
    let policy = CachePolicy::new(None, Some(128)).unwrap();
    let cache = LruCache::new(shared_backend(), "app", policy).unwrap();
    // "app:a" + 45 bytes = 50, "app:b" + 85 bytes = 90
    let a = "a".repeat(45);
    let b = "b".repeat(85);

    cache.set_item("a", &a).await.unwrap();
    cache.set_item("b", &b).await.unwrap();

    assert_eq!(cache.get_item("a").await.unwrap(), None);
    assert_eq!(cache.get_item("b").await.unwrap(), Some(b));
    assert!(cache.get_size().await.unwrap() <= 128);
}

#[tokio::test]
async fn test_budget_smaller_than_record_stores_nothing() {
    let policy = CachePolicy::new(None, Some(20)).unwrap();
    let backend = shared_backend();
    let cache = LruCache::new(backend.clone(), "app", policy).unwrap();

    cache.set_item("k", "v").await.unwrap();

    assert_eq!(cache.get_item("k").await.unwrap(), None);
    assert!(cache.get_all_keys().await.unwrap().is_empty());
    assert!(cache.get_size().await.unwrap() > 20);
}

#[tokio::test]
async fn test_clear_all_leaves_only_empty_record() {
    let backend = shared_backend();
    let cache = LruCache::new(backend.clone(), "app", CachePolicy::unbounded()).unwrap();
    for (key, value) in [("a", "1"), ("b", "22"), ("c", "333")] {
        cache.set_item(key, value).await.unwrap();
    }

    cache.clear_all().await.unwrap();

    assert!(cache.get_all_keys().await.unwrap().is_empty());
    assert_eq!(
        cache.get_size().await.unwrap(),
        LruRecord::new().encoded_len() as u64
    );
    assert_eq!(backend.len().await, 1);
}
