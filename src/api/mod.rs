//! API Module
//!
//! HTTP handlers and routing exposing namespaced caches over REST.
//!
//! # Endpoints
//! - `/ns/:namespace/items[/:key]` - Set, get, delete, list and clear entries
//! - `/ns/:namespace/peek/:key` - Read without touching recency
//! - `/ns/:namespace/multi-get`, `/ns/:namespace/multi-remove` - Batch operations
//! - `/ns/:namespace/size` - Namespace footprint in bytes
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
