mod config;
mod errors;
mod generation;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_app;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing GROQ_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AlmostThere API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; the credential is validated here, once
    let llm = LlmClient::new(
        config.groq_api_key.clone(),
        config.llm_api_url.clone(),
        config.llm_model.clone(),
    )
    .context("Failed to initialize LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let state = AppState { llm: Arc::new(llm) };

    let app = build_app(state, &config.allowed_origins, &config.frontend_dir)?
        .layer(TraceLayer::new_for_http());
    info!(
        "Serving frontend from '{}', CORS origins: {:?}",
        config.frontend_dir, config.allowed_origins
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
