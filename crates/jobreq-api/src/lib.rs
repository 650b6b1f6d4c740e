//! JobReq API - HTTP server
//!
//! Provides HTTP endpoints for analyzing job descriptions:
//! - `GET /health`
//! - `POST /api/v1/analyze`
//! - `POST /api/v1/analyze/batch`

pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{analyze, health};
use crate::state::AppState;

/// API v1 routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze", post(analyze::analyze_handler))
        .route("/analyze/batch", post(analyze::batch_analyze_handler))
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body_size = state.config.server.max_body_size;
    let cors_enabled = state.config.server.cors_enabled;

    let router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes())
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
