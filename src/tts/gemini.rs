use async_trait::async_trait;
use serde_json::{json, Value};

use super::{rate_from_mime, Synthesis, TtsProvider};
use crate::audio;
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_VOICE: &str = "Kore";

/// Gemini speech generation.
///
/// The API returns inline base64 PCM with the sample rate tucked into a
/// MIME annotation (`audio/L16;rate=24000`) rather than a dedicated field.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    voice: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, base_url: Option<String>, voice: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: DEFAULT_MODEL.to_string(),
            voice: voice.unwrap_or_else(|| DEFAULT_VOICE.to_string()),
        }
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "contents": [{
                "parts": [{ "text": text }]
            }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.voice }
                    }
                }
            },
            "model": self.model,
        })
    }
}

#[async_trait]
impl TtsProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn synthesize(&self, text: &str) -> Result<Synthesis, AppError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let body: Value = response.json().await?;
        parse_response(&body)
    }
}

/// Extract PCM samples and sample rate from a generateContent response.
pub(crate) fn parse_response(body: &Value) -> Result<Synthesis, AppError> {
    let inline = body
        .pointer("/candidates/0/content/parts/0/inlineData")
        .ok_or_else(|| {
            AppError::UpstreamPayload("missing inlineData in Gemini response".to_string())
        })?;

    let data = inline.get("data").and_then(Value::as_str).ok_or_else(|| {
        AppError::UpstreamPayload("missing audio data in Gemini response".to_string())
    })?;

    let mime = inline
        .get("mimeType")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::UpstreamPayload("missing mimeType in Gemini response".to_string())
        })?;

    let sample_rate = rate_from_mime(mime)?;
    let samples = audio::decode_base64_samples(data)?;

    Ok(Synthesis {
        samples,
        sample_rate,
    })
}
