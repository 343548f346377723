mod company;
mod config;
mod db;
mod errors;
mod extraction;
mod graph;
mod hume;
mod jobs;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::company::LlmCompanyValidator;
use crate::config::Config;
use crate::db::create_pool;
use crate::graph::zep::{GraphProvider, ZepClient};
use crate::hume::HumeClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interim API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    // One HTTP client shared by the LLM, Zep and Hume clients
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .context("Failed to build HTTP client")?;

    let llm = LlmClient::new(http.clone(), config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let company_validator = Arc::new(LlmCompanyValidator::new(llm.clone()));

    let zep = ZepClient::new(
        http.clone(),
        config.zep_api_key.clone(),
        config.zep_base_url.clone(),
    );
    if zep.is_enabled() {
        info!("Zep graph client initialized ({})", config.zep_base_url);
    } else {
        warn!("ZEP_API_KEY not set; user graphs will use the local fallback");
    }

    let hume = HumeClient::new(
        http,
        config.hume_api_key.clone(),
        config.hume_config_id.clone(),
        config.hume_base_url.clone(),
    );
    if config.hume_api_key.is_none() {
        warn!("HUME_API_KEY not set; /api/hume-config will return errors");
    }

    let state = AppState {
        db,
        llm,
        company_validator,
        graph_provider: Arc::new(zep),
        hume,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the site domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
