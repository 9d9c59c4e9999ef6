use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Per-instrument failures of the fetch → normalize → derive → score pipeline.
///
/// None of these are fatal: a failing instrument degrades to "unavailable"
/// for the current cycle and is retried on the next one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Fetch failed: {0}")]
    FetchFailure(String),

    #[error("Insufficient data: {bars} bars, need at least {required}")]
    InsufficientData { bars: usize, required: usize },

    #[error("Indicator undefined at last bar: {0}")]
    IndicatorUndefined(&'static str),

    #[error("Series mixes naive and timezone-aware timestamps")]
    TimezoneMismatch,

    #[error("Timestamps not strictly increasing at bar {index}")]
    UnorderedSeries { index: usize },
}

impl EngineError {
    /// Short machine-readable kind for logs and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::FetchFailure(_) => "fetch_failure",
            EngineError::InsufficientData { .. } => "insufficient_data",
            EngineError::IndicatorUndefined(_) => "indicator_undefined",
            EngineError::TimezoneMismatch => "timezone_mismatch",
            EngineError::UnorderedSeries { .. } => "unordered_series",
        }
    }
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Engine(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
            AppError::Anyhow(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
