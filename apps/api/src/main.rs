mod config;
mod errors;
mod extract;
mod job_description;
mod llm_client;
mod routes;
mod state;
mod tailoring;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extract::Extractor;
use crate::job_description::HttpJobPageFetcher;
use crate::llm_client::GeminiClient;
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

    info!("Starting CV Tailor API v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; tailoring calls will be rejected by the provider");
    }

    // Upload spool directory
    std::fs::create_dir_all(&config.upload_tmp_dir).with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.upload_tmp_dir.display()
        )
    })?;
    let extractor = Extractor::new(config.upload_tmp_dir.clone(), config.extraction_timeout);
    info!(
        "Extractor initialized (spool dir: {}, timeout: {}s)",
        config.upload_tmp_dir.display(),
        config.extraction_timeout.as_secs()
    );

    // Job page scraper
    let job_pages =
        HttpJobPageFetcher::new(&config.job_description_selector, config.scrape_timeout)
            .context("Failed to initialize job page fetcher")?;
    info!(
        "Job page fetcher initialized (selector: {})",
        config.job_description_selector
    );

    // Generative model client
    let model = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
    );
    info!("LLM client initialized (model: {})", model.model());

    let state = AppState {
        config: config.clone(),
        extractor,
        job_pages: Arc::new(job_pages),
        model: Arc::new(model),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
