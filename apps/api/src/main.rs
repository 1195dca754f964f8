mod config;
mod errors;
mod llm_client;
mod recommend;
mod routes;
mod selection;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::recommend::SessionStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bookworm API v{}", env!("CARGO_PKG_VERSION"));

    // Outbound Gemini client; the key is injected here, never read at call time
    let source = Arc::new(GeminiClient::new(
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
        config.gemini_api_key.clone(),
    ));
    info!("Gemini client initialized (model: {})", config.gemini_model);

    // Build app state
    let state = AppState {
        sessions: Arc::new(SessionStore::default()),
        source,
        config: config.clone(),
    };

    // Build router; the browser form is a cross-origin caller
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
