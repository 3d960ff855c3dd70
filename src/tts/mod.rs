pub mod gemini;
pub mod google;
pub mod retry;

use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::audio::{self, AudioError};
use crate::error::AppError;

pub use gemini::GeminiProvider;
pub use google::GoogleCloudProvider;
pub use retry::RetryPolicy;

/// Raw synthesis result from an upstream provider: mono signed 16-bit PCM
/// plus the rate the provider generated it at.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

/// A hosted text-to-speech API.
///
/// Adapters translate between a provider's wire format and [`Synthesis`];
/// everything downstream (retry, WAV encoding, HTTP responses) is shared.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn synthesize(&self, text: &str) -> Result<Synthesis, AppError>;
}

pub struct TtsService {
    provider: Arc<dyn TtsProvider>,
    retry: RetryPolicy,
}

impl TtsService {
    pub fn new(provider: Arc<dyn TtsProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Synthesize `text` into a playable WAV buffer.
    pub async fn speak(&self, text: &str) -> Result<Vec<u8>, AppError> {
        let provider = Arc::clone(&self.provider);
        let synthesis = self
            .retry
            .run(|| {
                let provider = Arc::clone(&provider);
                let text = text.to_string();
                async move { provider.synthesize(&text).await }
            })
            .await?;

        tracing::debug!(
            provider = self.provider.name(),
            samples = synthesis.samples.len(),
            sample_rate = synthesis.sample_rate,
            "synthesis complete"
        );

        let wav = audio::encode_wav(&synthesis.samples, synthesis.sample_rate)?;
        Ok(wav)
    }
}

lazy_static! {
    static ref RATE_REGEX: Regex = Regex::new(r"rate=(\d+)").unwrap();
}

/// Extract the sample rate from a MIME annotation such as
/// `audio/L16;codec=pcm;rate=24000`.
pub fn rate_from_mime(mime: &str) -> Result<u32, AudioError> {
    let caps = RATE_REGEX.captures(mime).ok_or_else(|| {
        AudioError::MalformedInput(format!("no rate= annotation in MIME type '{}'", mime))
    })?;

    let rate: i64 = caps[1].parse().map_err(|_| {
        AudioError::MalformedInput(format!("unparsable rate in MIME type '{}'", mime))
    })?;

    audio::checked_sample_rate(rate)
}
