//! API Route Configuration

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::logging_middleware;

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health & Model
        .route("/health", get(handlers::health_check))
        .route("/model", get(handlers::model_info))
        .route("/stats", get(handlers::get_stats))
        // Scoring
        .route("/predict", post(handlers::predict))
        .route("/analyze", post(handlers::analyze))
        // Dashboard data
        .route("/transactions", get(handlers::list_transactions))
        .route("/transactions/real-world", get(handlers::real_world_transactions))
        .route("/transactions/:id", get(handlers::get_transaction))
        .route("/sample", get(handlers::sample));

    // Build full router
    Router::new()
        .nest("/v1", api_v1)
        // Also expose at root for platform health probes
        .route("/health", get(handlers::health_check))
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}
