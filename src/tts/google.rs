use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Synthesis, TtsProvider};
use crate::audio::{self, transport, WAV_HEADER_LEN};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://texttospeech.googleapis.com";
const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// Google Cloud Text-to-Speech (`text:synthesize`).
pub struct GoogleCloudProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    language_code: String,
    sample_rate: u32,
}

impl GoogleCloudProvider {
    pub fn new(api_key: String, base_url: Option<String>, language_code: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            language_code: language_code.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "input": { "text": text },
            "voice": {
                "languageCode": self.language_code,
                "ssmlGender": "NEUTRAL"
            },
            "audioConfig": {
                "audioEncoding": "LINEAR16",
                "sampleRateHertz": self.sample_rate
            },
        })
    }
}

#[async_trait]
impl TtsProvider for GoogleCloudProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn synthesize(&self, text: &str) -> Result<Synthesis, AppError> {
        let url = format!(
            "{}/v1/text:synthesize?key={}",
            self.base_url, self.api_key
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
                "Cloud TTS returned {}: {}",
                status, body
            )));
        }

        let body: Value = response.json().await?;
        parse_response(&body, self.sample_rate)
    }
}

/// Extract PCM samples from a `text:synthesize` response.
///
/// LINEAR16 responses arrive as complete WAV files, so the adapter strips
/// the container and trusts the rate recorded in its header; bare PCM
/// falls back to the rate we asked for.
pub(crate) fn parse_response(body: &Value, requested_rate: u32) -> Result<Synthesis, AppError> {
    let audio_content = body
        .get("audioContent")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::UpstreamPayload("missing audioContent in synthesize response".to_string())
        })?;

    let bytes = transport::decode_base64(audio_content)?;

    let (pcm, sample_rate) = match strip_wav_header(&bytes) {
        Some((data, rate)) => (data, audio::checked_sample_rate(rate as i64)?),
        None => (&bytes[..], requested_rate),
    };

    let samples = transport::bytes_to_samples(pcm)?;

    Ok(Synthesis {
        samples,
        sample_rate,
    })
}

fn strip_wav_header(bytes: &[u8]) -> Option<(&[u8], u32)> {
    if bytes.len() < WAV_HEADER_LEN || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return None;
    }
    let rate = u32::from_le_bytes(bytes[24..28].try_into().ok()?);
    Some((&bytes[WAV_HEADER_LEN..], rate))
}
