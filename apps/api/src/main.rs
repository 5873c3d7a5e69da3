mod config;
mod errors;
mod layout;
mod llm_client;
mod render;
mod routes;
mod state;
mod worksheet;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::{default_page_geometry, StandardFontMetrics};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::worksheet::source::GeminiWorksheetSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={level},tower_http={level}",
                env!("CARGO_CRATE_NAME"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Worksheet API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Page layout: US letter, 1" margins, Helvetica 11pt
    let page_geometry = default_page_geometry();
    page_geometry
        .validate()
        .context("default page geometry is invalid")?;
    info!(
        "Page geometry: {}x{}pt {:?} {}pt",
        page_geometry.page_width,
        page_geometry.page_height,
        page_geometry.font_family,
        page_geometry.font_size
    );

    // Build app state
    let state = AppState {
        source: Arc::new(GeminiWorksheetSource::new(llm)),
        measurer: Arc::new(StandardFontMetrics),
        page_geometry,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_addr()))?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
