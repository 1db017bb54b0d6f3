//! Axum route handlers for the Tailoring API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::generator::tailor_cv;
use crate::tailoring::models::{TailorRequest, TailorResponse};

/// POST /api/tailor
///
/// Resolves the job description (pasted or scraped), then asks the model for a CV
/// tailored to it. Scrape problems come back as `warnings`.
pub async fn handle_tailor(
    State(state): State<AppState>,
    payload: Result<Json<TailorRequest>, JsonRejection>,
) -> Result<Json<TailorResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let outcome = tailor_cv(
        request,
        state.job_pages.as_ref(),
        state.model.as_ref(),
        state.config.uploaded_cv_field,
    )
    .await?;

    Ok(Json(TailorResponse {
        tailored_cv: outcome.tailored_cv,
        warnings: outcome.warnings,
    }))
}
