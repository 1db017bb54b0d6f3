use std::path::Path;

use tracing::debug;

use super::ExtractError;

/// Extracts text page by page; pages are joined with a single newline.
///
/// `pdf-extract` opens every page with its own blank lines, so each page is
/// stripped of surrounding newlines before joining.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_by_pages(path))
        .map_err(|_| ExtractError::Parse("PDF parser crashed on this file".to_string()))?
        .map_err(|e| ExtractError::Parse(format!("failed to parse PDF: {e}")))?;

    debug!(page_count = pages.len(), "PDF pages extracted");
    Ok(pages
        .iter()
        .map(|page| page.trim_matches(|c| c == '\n' || c == '\r'))
        .collect::<Vec<_>>()
        .join("\n"))
}
