use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Neither the pasted text nor the scraped page produced a description.
    /// Carries the scrape warnings collected on the way.
    #[error("No job description could be resolved")]
    MissingJobDescription { warnings: Vec<String> },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MissingJobDescription { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Extraction(ExtractError::UnsupportedFormat(_)) => StatusCode::BAD_REQUEST,
            AppError::Extraction(_) | AppError::Llm(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut warnings: &[String] = &[];

        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Extraction(ExtractError::UnsupportedFormat(ext)) => {
                tracing::warn!("Rejected upload with unsupported extension '{ext}'");
                "Unsupported file type. Only PDF, DOCX, and MD are supported.".to_string()
            }
            AppError::Extraction(ExtractError::Io(e)) => {
                tracing::error!("Upload spooling failed: {e}");
                "An internal server error occurred".to_string()
            }
            AppError::Extraction(e) => {
                tracing::error!("Error parsing CV file: {e}");
                format!("Error parsing CV file: {e}")
            }
            AppError::MissingJobDescription { warnings: w } => {
                warnings = w.as_slice();
                "Could not resolve a job description. Paste the description or provide a job URL with a readable description.".to_string()
            }
            AppError::Llm(e) => {
                tracing::error!(provider_status = e.provider_status(), "LLM error: {e}");
                // Provider messages go back to the client verbatim.
                e.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = if warnings.is_empty() {
            json!({ "error": message })
        } else {
            json!({ "error": message, "warnings": warnings })
        };

        (status, Json(body)).into_response()
    }
}
