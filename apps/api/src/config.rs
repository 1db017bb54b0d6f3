use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::tailoring::models::CvField;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_JOB_DESCRIPTION_SELECTOR: &str = "#jobDescriptionText";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
///
/// Nothing is required: a missing `GEMINI_API_KEY` is passed through as an empty key
/// and the provider rejects the call.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub upload_tmp_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub extraction_timeout: Duration,
    pub scrape_timeout: Duration,
    pub job_description_selector: String,
    /// CV field replaced by uploaded document text when both are submitted.
    pub uploaded_cv_field: CvField,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            gemini_api_key: lookup("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            upload_tmp_dir: var("UPLOAD_TMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", var("MAX_UPLOAD_BYTES"), DEFAULT_MAX_UPLOAD_BYTES)?,
            extraction_timeout: Duration::from_secs(parse_or(
                "EXTRACTION_TIMEOUT_SECS",
                var("EXTRACTION_TIMEOUT_SECS"),
                30,
            )?),
            scrape_timeout: Duration::from_secs(parse_or(
                "SCRAPE_TIMEOUT_SECS",
                var("SCRAPE_TIMEOUT_SECS"),
                20,
            )?),
            job_description_selector: var("JOB_DESCRIPTION_SELECTOR")
                .unwrap_or_else(|| DEFAULT_JOB_DESCRIPTION_SELECTOR.to_string()),
            uploaded_cv_field: var("UPLOADED_CV_FIELD")
                .map(|v| v.parse::<CvField>())
                .transpose()
                .context("UPLOADED_CV_FIELD must name a CV field")?
                .unwrap_or_default(),
        })
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}
