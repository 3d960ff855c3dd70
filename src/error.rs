use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::audio::AudioError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream TTS request failed: {0}")]
    Upstream(String),

    #[error("Upstream returned an unusable payload: {0}")]
    UpstreamPayload(String),

    #[error("Audio encoding failed: {0}")]
    Audio(#[from] AudioError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream(e.to_string())
    }
}

impl AppError {
    /// Transient upstream failures are worth retrying; everything else
    /// (bad input, malformed payloads) fails identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Upstream(_))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone()),
            AppError::UpstreamPayload(msg) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_PAYLOAD", msg.clone())
            }
            AppError::Audio(e) => (StatusCode::BAD_GATEWAY, "AUDIO_ERROR", e.to_string()),
            AppError::JsonError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "JSON_ERROR",
                e.to_string(),
            ),
        };

        tracing::error!("Request failed: {} - {}", code, message);

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}
