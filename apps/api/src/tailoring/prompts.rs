// Prompt text for CV tailoring. The CV block always precedes the job description.

use crate::tailoring::models::{CvField, CvInput};

/// Instruction preamble sent before the CV.
pub const TAILOR_INSTRUCTIONS: &str = "Based on the following CV and job description, \
please rewrite the CV to be perfectly tailored for the job.\n\
Make sure to highlight the most relevant skills and experience.\n\
Return the tailored CV as Markdown.";

pub const CV_HEADING: &str = "**My CV:**";
pub const JOB_DESCRIPTION_HEADING: &str = "**Job Description:**";
pub const TAILORED_CV_HEADING: &str = "**Tailored CV:**";

/// Builds the single instruction prompt from a CV and a job description.
/// Both are embedded verbatim; nothing is truncated.
pub fn build_tailoring_prompt(cv: &CvInput, job_description: &str) -> String {
    let cv_block = match cv {
        CvInput::Structured(fields) => CvField::ALL
            .iter()
            .map(|field| format!("{}: {}", field.label(), fields.get(*field)))
            .collect::<Vec<_>>()
            .join("\n"),
        CvInput::Extracted(text) => text.clone(),
    };

    format!(
        "{TAILOR_INSTRUCTIONS}\n\n{CV_HEADING}\n{cv_block}\n\n{JOB_DESCRIPTION_HEADING}\n{job_description}\n\n{TAILORED_CV_HEADING}\n"
    )
}
