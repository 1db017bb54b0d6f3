use std::path::Path;

use super::ExtractError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Markdown and plain text are returned verbatim, minus a leading BOM.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    decode_utf8(bytes)
}

fn decode_utf8(mut bytes: Vec<u8>) -> Result<String, ExtractError> {
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    String::from_utf8(bytes).map_err(|e| {
        ExtractError::Decode(format!(
            "invalid byte sequence at offset {}",
            e.utf8_error().valid_up_to()
        ))
    })
}
