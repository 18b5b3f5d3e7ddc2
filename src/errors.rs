use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Which external lookup an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Stage 1: reverse lookup keyed by email.
    ReverseLookup,
    /// Stage 2: contact enrichment by LinkedIn URL or name/domain.
    ContactEnrichment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ReverseLookup => write!(f, "reverse email lookup"),
            Stage::ContactEnrichment => write!(f, "contact enrichment"),
        }
    }
}

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Missing or unusable credential / settings. Fatal, never retried.
    Configuration(String),
    /// An external lookup failed (HTTP error or malformed response).
    StageFailure {
        /// The stage that failed.
        stage: Stage,
        /// Best-effort message drawn from the provider response.
        message: String,
    },
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Internal server error.
    InternalError(String),
}

impl AppError {
    pub fn stage(stage: Stage, message: impl Into<String>) -> Self {
        AppError::StageFailure {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::StageFailure { stage, message } => {
                write!(f, "{} failed: {}", stage, message)
            }
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    /// Logs errors appropriately based on their severity.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service is not configured".to_string(),
                )
            }
            AppError::StageFailure { stage, message } => {
                tracing::error!("{} failed: {}", stage, message);
                (StatusCode::BAD_GATEWAY, message.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
