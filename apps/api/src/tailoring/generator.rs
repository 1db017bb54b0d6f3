//! Tailoring pipeline: resolve CV → resolve job description → build prompt → call model.

use tracing::info;

use crate::errors::AppError;
use crate::job_description::{resolve_job_description, JobPageFetcher};
use crate::llm_client::TailoringModel;
use crate::tailoring::models::{CvField, CvInput, TailorRequest};
use crate::tailoring::prompts::build_tailoring_prompt;

#[derive(Debug)]
pub struct TailorOutcome {
    pub tailored_cv: String,
    /// Scrape warnings that did not stop the request.
    pub warnings: Vec<String>,
}

pub async fn tailor_cv(
    request: TailorRequest,
    fetcher: &dyn JobPageFetcher,
    model: &dyn TailoringModel,
    uploaded_field: CvField,
) -> Result<TailorOutcome, AppError> {
    let cv = CvInput::resolve(request.cv, request.uploaded_cv_content, uploaded_field)
        .filter(|cv| !cv.is_blank())
        .ok_or_else(|| {
            AppError::Validation(
                "CV content is required: fill in the CV form or upload a CV file.".to_string(),
            )
        })?;

    let resolved = resolve_job_description(
        request.job_description_text.as_deref(),
        request.job_url.as_deref(),
        fetcher,
    )
    .await;
    let warnings: Vec<String> = resolved.warnings.iter().map(|w| w.to_string()).collect();

    let Some((job_description, source)) = &resolved.description else {
        return Err(AppError::MissingJobDescription { warnings });
    };

    let prompt = build_tailoring_prompt(&cv, job_description);
    info!(
        cv_kind = match cv {
            CvInput::Structured(_) => "structured",
            CvInput::Extracted(_) => "extracted",
        },
        description_source = ?source,
        prompt_chars = prompt.chars().count(),
        "Submitting tailoring prompt"
    );

    let tailored_cv = model.generate(&prompt).await?;

    Ok(TailorOutcome {
        tailored_cv,
        warnings,
    })
}
