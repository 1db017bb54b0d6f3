use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

/// Multipart field carrying the uploaded CV.
pub const CV_FILE_FIELD: &str = "cvFile";

#[derive(Debug, Serialize)]
pub struct UploadCvResponse {
    pub text: String,
}

struct UploadedFile {
    file_name: String,
    bytes: Vec<u8>,
}

/// POST /api/upload-cv
///
/// Extracts plain text from a PDF, DOCX or Markdown CV sent as multipart field `cvFile`.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadCvResponse>, AppError> {
    let mut multipart = multipart
        .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e.body_text())))?;
    let upload = read_cv_file(&mut multipart, state.config.max_upload_bytes)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded.".to_string()))?;

    info!(
        file_name = %upload.file_name,
        size = upload.bytes.len(),
        "Received CV upload"
    );

    let text = state
        .extractor
        .extract(&upload.file_name, &upload.bytes)
        .await?;

    Ok(Json(UploadCvResponse { text }))
}

async fn read_cv_file(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e.body_text())))?
    {
        if field.name() != Some(CV_FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e.body_text())))?;

        if bytes.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "File is too large. The upload limit is {max_bytes} bytes."
            )));
        }
        if bytes.is_empty() && file_name.is_empty() {
            // Browsers send an empty part when no file was selected.
            return Ok(None);
        }

        return Ok(Some(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}
