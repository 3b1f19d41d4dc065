//! API Routes
//!
//! Configures the Axum router with all cache strategy endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, invalidate_handler, lookup_handler, recommendation_handler, set_handler,
    stats_handler, strategy_handler, warmup_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET  /cache/:pattern` - Describe the resolved strategy
/// - `PUT  /cache/:pattern` - Write a value through a strategy
/// - `POST /cache/:pattern/lookup` - Read a value through a strategy
/// - `POST /cache/:pattern/invalidate` - Invalidate a key or its scope
/// - `POST /cache/:pattern/warmup` - Warm a list of keys
/// - `GET  /recommendation` - Suggest a pattern for an access profile
/// - `GET  /stats` - Per-tier statistics
/// - `GET  /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache/:pattern", get(strategy_handler).put(set_handler))
        .route("/cache/:pattern/lookup", post(lookup_handler))
        .route("/cache/:pattern/invalidate", post(invalidate_handler))
        .route("/cache/:pattern/warmup", post(warmup_handler))
        .route("/recommendation", get(recommendation_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
