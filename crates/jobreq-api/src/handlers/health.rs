//! Health check handler

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub extractor: ExtractorInfo,
    pub stats: ServiceStats,
}

/// What the pipeline runs with
#[derive(Serialize)]
pub struct ExtractorInfo {
    /// Recognizer name; absent when entity recognition is disabled
    pub recognizer: Option<String>,
    pub confidence_threshold: f64,
    pub pattern_count: usize,
    pub max_text_length: usize,
}

#[derive(Serialize)]
pub struct ServiceStats {
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub analyses: u64,
    pub degraded_analyses: u64,
}

/// Liveness check with pipeline information and counters
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let extractor = &state.extractor;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        extractor: ExtractorInfo {
            recognizer: extractor.recognizer_name().map(str::to_string),
            confidence_threshold: extractor.confidence_threshold(),
            pattern_count: extractor.pattern_count(),
            max_text_length: state.config.extraction.max_text_length,
        },
        stats: ServiceStats {
            uptime_seconds: state.uptime_secs(),
            total_requests: state.get_request_count(),
            analyses: state.get_analyzed_count(),
            degraded_analyses: state.get_degraded_count(),
        },
    })
}
