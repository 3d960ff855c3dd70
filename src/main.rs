use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod audio;
mod error;
mod tts;

use api::routes::{create_router, AppState};
use tts::{GeminiProvider, GoogleCloudProvider, RetryPolicy, TtsProvider, TtsService};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .expect("PORT must be a number");
    let provider_name = std::env::var("TTS_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
    let api_key = std::env::var("TTS_API_KEY").unwrap_or_default();
    let api_url = std::env::var("TTS_API_URL").ok();
    let voice = std::env::var("TTS_VOICE").ok();

    let provider: Arc<dyn TtsProvider> = match provider_name.as_str() {
        "gemini" => Arc::new(GeminiProvider::new(api_key, api_url, voice)),
        "google" => Arc::new(GoogleCloudProvider::new(api_key, api_url, voice)),
        other => {
            eprintln!("Unknown TTS_PROVIDER '{}' (expected 'gemini' or 'google')", other);
            std::process::exit(1);
        }
    };

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid address");

    tracing::info!("TTS Relay Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Upstream provider: {}", provider.name());

    // Create app state
    let state = Arc::new(AppState {
        tts: TtsService::new(provider, RetryPolicy::default()),
    });

    // Create router
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
