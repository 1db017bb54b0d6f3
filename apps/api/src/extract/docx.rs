//! DOCX raw-text extraction.
//!
//! Reads `word/document.xml` from the archive and keeps only the text of `w:t` runs.
//! Tabs and breaks inside runs become `\t` and `\n`; paragraphs are separated by a
//! blank line. Everything else (styles, numbering, tables layout) is discarded.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_XML: &str = "word/document.xml";

pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ExtractError::Parse(format!("invalid DOCX archive: {e}")))?;

    let mut xml = String::new();
    match archive.by_name(DOCUMENT_XML) {
        Ok(mut entry) => {
            entry
                .read_to_string(&mut xml)
                .map_err(|e| ExtractError::Parse(format!("unreadable {DOCUMENT_XML}: {e}")))?;
        }
        Err(ZipError::FileNotFound) => {
            return Err(ExtractError::Parse(format!(
                "DOCX archive has no {DOCUMENT_XML}"
            )))
        }
        Err(e) => return Err(ExtractError::Parse(format!("invalid DOCX archive: {e}"))),
    }

    document_text(&xml)
}

fn document_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if in_run => current.push('\t'),
                b"br" | b"cr" if in_run => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| {
                    ExtractError::Parse(format!("malformed text in {DOCUMENT_XML}: {e}"))
                })?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Parse(format!(
                    "malformed {DOCUMENT_XML} at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs
        .iter()
        .map(|p| p.trim_end())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n"))
}
