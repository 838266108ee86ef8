//! LRU Eviction Module
//!
//! Decides which entries leave a namespace so that it fits its policy.

use tracing::{debug, trace};

use crate::cache::LruRecord;
use crate::error::{CacheError, Result};

// == Cache Policy ==
/// Capacity limits of a namespace. `None` leaves a dimension unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    max_entries: Option<usize>,
    max_size: Option<u64>,
}

impl CachePolicy {
    // == Constructor ==
    /// Creates a policy, rejecting zero limits.
    pub fn new(max_entries: Option<usize>, max_size: Option<u64>) -> Result<Self> {
        if max_entries == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_entries must be a positive integer".to_string(),
            ));
        }
        if max_size == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_size must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            max_entries,
            max_size,
        })
    }

    /// A policy that never evicts.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    /// Byte budget covering values, composite keys and the LRU record.
    pub fn max_size(&self) -> Option<u64> {
        self.max_size
    }

    pub fn is_bounded(&self) -> bool {
        self.max_entries.is_some() || self.max_size.is_some()
    }

    /// Checks whether a single entry of `size` bytes could ever be stored.
    pub fn admits(&self, size: u64) -> bool {
        self.max_size.map_or(true, |max| size <= max)
    }
}

// == Enforce ==
/// Evicts least recently used entries from `record` until it fits `policy`.
///
/// The entry-count limit is applied first, then the byte budget, which
/// counts the record's own encoded length. Returns the evicted keys, oldest
/// first. The backend is not touched; deleting the evicted values is up to
/// the caller.
///
/// If the empty record alone exceeds `max_size`, eviction stops once the
/// record is empty and the namespace stays over budget.
pub fn enforce(record: &mut LruRecord, policy: &CachePolicy) -> Vec<String> {
    let mut evicted = Vec::new();

    if let Some(max_entries) = policy.max_entries {
        while record.len() > max_entries {
            let Some((key, size)) = record.pop_oldest() else {
                break;
            };
            trace!(key = %key, size, "Evicting entry over count limit");
            evicted.push(key);
        }
    }

    if let Some(max_size) = policy.max_size {
        while record.footprint() > max_size {
            let Some((key, size)) = record.pop_oldest() else {
                break;
            };
            trace!(key = %key, size, "Evicting entry over size budget");
            evicted.push(key);
        }
        if record.footprint() > max_size {
            debug!(
                footprint = record.footprint(),
                max_size, "LRU record alone exceeds the size budget"
            );
        }
    }

    evicted
}
