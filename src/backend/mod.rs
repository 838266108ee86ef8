//! Backend Module
//!
//! The asynchronous key-value contract the cache is layered on, plus an
//! in-memory implementation used by the server and the tests.

mod memory;
mod traits;

pub use memory::MemoryBackend;
pub use traits::{BackendError, KeyValueBackend};
