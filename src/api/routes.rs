//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, exists_handler, get_handler, health_handler, set_handler, stats_handler,
    update_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/data` - List an owner's entries, or get one entry
/// - `HEAD /api/data` - Check whether an entry exists
/// - `POST /api/data` - Create or overwrite an entry
/// - `PUT /api/data` - Update an entry's expiry
/// - `DELETE /api/data` - Delete an entry or every entry under a prefix
/// - `GET /stats` - Get store statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Body limit: `max_body_bytes` from the configuration
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route(
            "/api/data",
            get(get_handler)
                .head(exists_handler)
                .post(set_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
