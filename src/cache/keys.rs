//! Composite Key Module
//!
//! Maps (namespace, key) pairs onto single backend keys.

use crate::cache::{METADATA_KEY, SEPARATOR};

// == Compose ==
/// Builds the backend key `"{namespace}:{key}"`.
pub fn compose(namespace: &str, key: &str) -> String {
    let mut composite = String::with_capacity(namespace.len() + 1 + key.len());
    composite.push_str(namespace);
    composite.push(SEPARATOR);
    composite.push_str(key);
    composite
}

// == Decompose ==
/// Strips the namespace prefix from a backend key.
///
/// Returns `None` when the key belongs to another namespace.
pub fn decompose<'a>(namespace: &str, composite: &'a str) -> Option<&'a str> {
    composite
        .strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix(SEPARATOR))
}

// == Metadata Key ==
/// Returns the reserved backend key holding the namespace's LRU record.
pub fn metadata_key(namespace: &str) -> String {
    compose(namespace, METADATA_KEY)
}

/// Checks whether a logical key is the reserved metadata key.
pub fn is_reserved(key: &str) -> bool {
    key == METADATA_KEY
}
