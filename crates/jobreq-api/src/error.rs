//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use jobreq_core::JobReqError;

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    ServiceUnavailable(String),
    Configuration(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("SERVICE_UNAVAILABLE", "Entity recognition model unavailable")
                    .with_details(msg),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("CONFIGURATION_ERROR", "Extractor is misconfigured")
                    .with_details(msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal_error().with_details(msg),
            ),
        };

        if status.is_server_error() {
            tracing::error!("{} {}", error.code, error.details.as_deref().unwrap_or(""));
        }

        (status, Json(error)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JobReqError> for AppError {
    fn from(err: JobReqError) -> Self {
        match err {
            JobReqError::InvalidInput(msg) => AppError::BadRequest(msg),
            JobReqError::ModelUnavailable(msg) => AppError::ServiceUnavailable(msg),
            JobReqError::ConfigurationError(msg) => AppError::Configuration(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}
