use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{HealthResponse, ProviderResponse, SpeakRequest};
use crate::api::routes::AppState;
use crate::error::AppError;

pub async fn speak(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpeakRequest>,
) -> Result<Response, AppError> {
    // Validate input
    if request.text.is_empty() {
        return Err(AppError::BadRequest("Text cannot be empty".into()));
    }

    if request.text.len() > 10000 {
        return Err(AppError::BadRequest(
            "Text too long (max 10000 chars)".into(),
        ));
    }

    // Relay to the upstream TTS API and encode as WAV
    let wav = state.tts.speak(&request.text).await?;

    // Return audio response
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "audio/wav")], wav).into_response())
}

pub async fn provider(State(state): State<Arc<AppState>>) -> Json<ProviderResponse> {
    Json(ProviderResponse {
        provider: state.tts.provider_name().to_string(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
