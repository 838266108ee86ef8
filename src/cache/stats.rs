//! Cache Statistics Module
//!
//! Tracks cache activity including hits, misses, evictions and rejections.

use std::ops::AddAssign;

use serde::Serialize;

// == Cache Stats ==
/// Activity counters of one cache instance.
///
/// Observational only; eviction decisions never read them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that found a value
    pub hits: u64,
    /// Reads that found nothing (never stored, evicted or rejected)
    pub misses: u64,
    /// Entries removed by the LRU policy
    pub evictions: u64,
    /// Writes dropped because the entry alone exceeds the size budget
    pub rejections: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hits(&mut self, count: u64) {
        self.hits += count;
    }

    pub fn record_misses(&mut self, count: u64) {
        self.misses += count;
    }

    pub fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }

    pub fn record_rejection(&mut self) {
        self.rejections += 1;
    }
}

impl AddAssign for CacheStats {
    fn add_assign(&mut self, other: Self) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.evictions += other.evictions;
        self.rejections += other.rejections;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.rejections, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hits(3);
        stats.record_misses(1);
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_evictions_and_rejections() {
        let mut stats = CacheStats::new();
        stats.record_evictions(2);
        stats.record_evictions(1);
        stats.record_rejection();
        assert_eq!(stats.evictions, 3);
        assert_eq!(stats.rejections, 1);
    }

    #[test]
    fn test_add_assign() {
        let mut total = CacheStats::new();
        let mut a = CacheStats::new();
        a.record_hits(2);
        a.record_rejection();
        let mut b = CacheStats::new();
        b.record_misses(5);
        b.record_evictions(4);

        total += a;
        total += b;

        assert_eq!(
            total,
            CacheStats {
                hits: 2,
                misses: 5,
                evictions: 4,
                rejections: 1,
            }
        );
    }
}
