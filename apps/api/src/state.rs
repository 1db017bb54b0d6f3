use std::sync::Arc;

use crate::config::Config;
use crate::extract::Extractor;
use crate::job_description::JobPageFetcher;
use crate::llm_client::TailoringModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; nothing is shared between requests beyond this.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: Extractor,
    /// Scrapes job pages. Swapped for a double in tests.
    pub job_pages: Arc<dyn JobPageFetcher>,
    /// Generative model backend. Default: GeminiClient.
    pub model: Arc<dyn TailoringModel>,
}
