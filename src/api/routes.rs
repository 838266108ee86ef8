//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_all_handler, get_handler, health_handler,
    multi_get_handler, multi_remove_handler, peek_handler, set_handler, size_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /ns/:namespace/items` - Store a key-value pair
/// - `GET /ns/:namespace/items` - Read every entry in the namespace
/// - `DELETE /ns/:namespace/items` - Clear the namespace
/// - `GET /ns/:namespace/items/:key` - Retrieve a value by key
/// - `DELETE /ns/:namespace/items/:key` - Delete a key
/// - `GET /ns/:namespace/peek/:key` - Retrieve without touching recency
/// - `POST /ns/:namespace/multi-get` - Batch read
/// - `POST /ns/:namespace/multi-remove` - Batch delete
/// - `GET /ns/:namespace/size` - Bytes used by the namespace
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route(
            "/ns/:namespace/items",
            get(get_all_handler).put(set_handler).delete(clear_handler),
        )
        .route(
            "/ns/:namespace/items/:key",
            get(get_handler).delete(delete_handler),
        )
        .route("/ns/:namespace/peek/:key", get(peek_handler))
        .route("/ns/:namespace/multi-get", post(multi_get_handler))
        .route("/ns/:namespace/multi-remove", post(multi_remove_handler))
        .route("/ns/:namespace/size", get(size_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
