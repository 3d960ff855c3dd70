pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
