//! Requirement extraction handlers
//!
//! Extraction is CPU-bound (and may call the hosted recognizer with a blocking
//! client), so every call runs on the blocking thread pool.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use jobreq_batch::{BatchItem, BatchProcessor, BatchSummary};
use jobreq_core::AnalysisResult;

use crate::error::AppError;
use crate::state::AppState;

/// Analyze request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Job description text
    pub text: String,
}

/// Analyze response body: the analysis plus a degraded-mode flag
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,

    /// True when entity recognition was skipped and results are pattern-only
    pub degraded: bool,
}

/// Batch analyze request body
#[derive(Debug, Deserialize)]
pub struct BatchAnalyzeRequest {
    pub texts: Vec<String>,

    /// Include the aggregate summary
    #[serde(default = "default_true")]
    pub include_summary: bool,
}

fn default_true() -> bool {
    true
}

/// Batch analyze response body
#[derive(Debug, Serialize)]
pub struct BatchAnalyzeResponse {
    /// One record per submitted text, in submission order
    pub results: Vec<BatchItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BatchSummary>,
}

/// POST /api/v1/analyze
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    state.increment_requests();

    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Job description cannot be empty".to_string(),
        ));
    }
    state.config.extraction.check_length(&req.text)?;

    let extractor = Arc::clone(&state.extractor);
    let result = tokio::task::spawn_blocking(move || extractor.extract_requirements(&req.text))
        .await
        .map_err(|e| AppError::Internal(format!("extraction task failed: {e}")))??;

    let degraded = result.is_degraded();
    state.record_analysis(degraded);
    tracing::info!(
        "Analyzed {} characters, score {:.2}{}",
        result.text_length,
        result.complexity_score,
        if degraded { " (degraded)" } else { "" }
    );

    Ok(Json(AnalyzeResponse { result, degraded }))
}

/// POST /api/v1/analyze/batch
pub async fn batch_analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchAnalyzeRequest>,
) -> Result<Json<BatchAnalyzeResponse>, AppError> {
    state.increment_requests();

    if req.texts.is_empty() {
        return Err(AppError::BadRequest("texts cannot be empty".to_string()));
    }

    let extractor = Arc::clone(&state.extractor);
    let limits = state.config.extraction.clone();
    let include_summary = req.include_summary;

    let (results, summary) = tokio::task::spawn_blocking(move || {
        let mut processor = BatchProcessor::new(extractor, limits);
        processor.process_texts(req.texts.as_slice());
        let summary = if include_summary {
            processor.summary_report()
        } else {
            None
        };
        (processor.into_results(), summary)
    })
    .await
    .map_err(|e| AppError::Internal(format!("batch task failed: {e}")))?;

    for analysis in results.iter().filter_map(BatchItem::analysis) {
        state.record_analysis(analysis.is_degraded());
    }
    tracing::info!("Batch analyzed {} texts", results.len());

    Ok(Json(BatchAnalyzeResponse { results, summary }))
}
