mod books;
mod config;
mod errors;
mod layout;
mod llm_client;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::{LayoutConfig, StyleRules};
use crate::llm_client::GroqClient;
use crate::routes::{build_router, cors_layer};
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

    info!("Starting bookplan API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = GroqClient::new(config.groq_api_key.clone(), config.groq_api_url.clone())?;
    info!("LLM client initialized (model: {})", config.llm_model);

    // PDF layout: A4, 50pt margins, default plan markers
    let layout_config = LayoutConfig::default();
    info!(
        "Layout page config: {}x{}pt, margin {}pt",
        layout_config.page.width_pt, layout_config.page.height_pt, layout_config.margin_pt
    );

    let state = AppState {
        llm: Arc::new(llm),
        config: config.clone(),
        style_rules: Arc::new(StyleRules::default()),
        layout_config,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
