//! Document text extraction for uploaded CVs.
//!
//! Uploads are spooled into a temporary file owned by a `NamedTempFile` guard, parsed on
//! the blocking pool, and the file is removed when the guard drops. That holds for every
//! exit path: success, parse failure, timeout and parser panics.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

pub mod docx;
pub mod handlers;
pub mod markdown;
pub mod pdf;

const TEMP_FILE_PREFIX: &str = "cv-upload-";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file extension '{0}'")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Parse(String),

    #[error("invalid UTF-8 text: {0}")]
    Decode(String),

    #[error("temporary file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document format derived from an upload's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Markdown,
    Unsupported(String),
}

impl DocumentFormat {
    /// Classifies a file name by the extension after its last `.`, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => DocumentFormat::Pdf,
            "docx" => DocumentFormat::Docx,
            "md" | "markdown" | "txt" => DocumentFormat::Markdown,
            _ => DocumentFormat::Unsupported(extension),
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Markdown => "md",
            DocumentFormat::Unsupported(ext) => ext,
        }
    }
}

/// Extracts plain text from a document already on disk, by format.
fn extract_from_path(format: &DocumentFormat, path: &Path) -> Result<String, ExtractError> {
    match format {
        DocumentFormat::Pdf => pdf::extract_text(path),
        DocumentFormat::Docx => docx::extract_text(path),
        DocumentFormat::Markdown => markdown::extract_text(path),
        DocumentFormat::Unsupported(ext) => Err(ExtractError::UnsupportedFormat(ext.clone())),
    }
}

/// Turns uploaded CV files into plain text.
#[derive(Debug, Clone)]
pub struct Extractor {
    tmp_dir: PathBuf,
    timeout: Duration,
}

impl Extractor {
    pub fn new(tmp_dir: PathBuf, timeout: Duration) -> Self {
        Self { tmp_dir, timeout }
    }

    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
        let format = DocumentFormat::from_file_name(file_name);
        if let DocumentFormat::Unsupported(ext) = &format {
            return Err(ExtractError::UnsupportedFormat(ext.clone()));
        }

        let spooled = self.spool(&format, bytes)?;
        let path = spooled.path().to_path_buf();
        debug!("Spooled upload to {}", path.display());

        let task_format = format.clone();
        let result = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || extract_from_path(&task_format, &path)),
        )
        .await;

        // `spooled` is still alive here and is dropped (deleted) on return.
        // A timed-out parse cannot be cancelled: the blocking task runs to completion
        // on the pool and its result is discarded.
        let text = match result {
            Err(_) => {
                return Err(ExtractError::Parse(format!(
                    "extraction timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
            Ok(Err(join_error)) if join_error.is_panic() => {
                return Err(ExtractError::Parse(format!(
                    "{} parser crashed on this file",
                    format.extension()
                )))
            }
            Ok(Err(join_error)) => {
                return Err(ExtractError::Parse(format!(
                    "extraction task failed: {join_error}"
                )))
            }
            Ok(Ok(extracted)) => extracted?,
        };

        info!(
            format = format.extension(),
            chars = text.chars().count(),
            "CV text extraction complete"
        );
        Ok(text)
    }

    fn spool(
        &self,
        format: &DocumentFormat,
        bytes: &[u8],
    ) -> Result<tempfile::NamedTempFile, ExtractError> {
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(&format!(".{}", format.extension()))
            .tempfile_in(&self.tmp_dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(file)
    }
}
