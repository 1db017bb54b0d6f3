//! Job description resolution.
//!
//! A pasted description always wins and never touches the network. Otherwise the job
//! page is scraped; scrape failures are downgraded to warnings so the caller can
//! decide what "no description" means.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

pub mod page_fetcher;

pub use self::page_fetcher::HttpJobPageFetcher;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("job page returned HTTP {0}")]
    Status(u16),

    #[error("invalid CSS selector '{0}'")]
    Selector(String),

    #[error("no job description found at selector '{0}'")]
    MissingNode(String),
}

/// Fetches a job page and pulls out its description text.
#[async_trait]
pub trait JobPageFetcher: Send + Sync {
    /// Returns the trimmed, non-empty description text.
    async fn fetch_description(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Non-fatal scrape failure, reported back to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeWarning {
    pub url: String,
    pub message: String,
}

impl fmt::Display for ScrapeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not extract job description from {}: {}",
            self.url, self.message
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSource {
    Manual,
    Scraped,
}

#[derive(Debug, Default)]
pub struct ResolvedJobDescription {
    pub description: Option<(String, DescriptionSource)>,
    pub warnings: Vec<ScrapeWarning>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolves the description from the pasted text or, failing that, the job URL.
pub async fn resolve_job_description(
    manual: Option<&str>,
    url: Option<&str>,
    fetcher: &dyn JobPageFetcher,
) -> ResolvedJobDescription {
    if let Some(text) = manual.filter(|m| !m.trim().is_empty()) {
        return ResolvedJobDescription {
            description: Some((text.to_string(), DescriptionSource::Manual)),
            warnings: Vec::new(),
        };
    }

    let Some(url) = non_blank(url) else {
        return ResolvedJobDescription::default();
    };

    match fetcher.fetch_description(url).await {
        Ok(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                let warning = ScrapeWarning {
                    url: url.to_string(),
                    message: "job description was empty".to_string(),
                };
                warn!("{warning}");
                return ResolvedJobDescription {
                    description: None,
                    warnings: vec![warning],
                };
            }
            info!(url, chars = text.chars().count(), "Scraped job description");
            ResolvedJobDescription {
                description: Some((text, DescriptionSource::Scraped)),
                warnings: Vec::new(),
            }
        }
        Err(e) => {
            let warning = ScrapeWarning {
                url: url.to_string(),
                message: e.to_string(),
            };
            warn!("{warning}");
            ResolvedJobDescription {
                description: None,
                warnings: vec![warning],
            }
        }
    }
}
