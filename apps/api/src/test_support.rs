//! Shared test doubles and fixture builders.

use std::io::{Cursor, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request};
use axum::Router;

use crate::config::Config;
use crate::extract::Extractor;
use crate::job_description::{JobPageFetcher, ScrapeError};
use crate::llm_client::{LlmError, TailoringModel};
use crate::state::AppState;

/// Serves `router` on an ephemeral local port for the rest of the test.
pub async fn spawn_stub(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Job page fetcher double that counts invocations.
/// The configured result is returned once; later calls report a missing node.
pub struct CountingFetcher {
    calls: Arc<AtomicUsize>,
    result: Mutex<Option<Result<String, ScrapeError>>>,
}

impl CountingFetcher {
    pub fn returning(result: Result<String, ScrapeError>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            result: Mutex::new(Some(result)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl JobPageFetcher for CountingFetcher {
    async fn fetch_description(&self, _url: &str) -> Result<String, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(ScrapeError::MissingNode("#jobDescriptionText".to_string())))
    }
}

/// Model double that records prompts and replies with a fixed text or a one-shot error.
pub struct StubModel {
    reply: String,
    error: Mutex<Option<LlmError>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            error: Mutex::new(None),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(error: LlmError) -> Self {
        Self {
            reply: String::new(),
            error: Mutex::new(Some(error)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn prompt_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl TailoringModel for StubModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.reply.clone()),
        }
    }
}

pub fn test_config(tmp_dir: &Path) -> Config {
    let mut config = Config::from_lookup(|_| None).unwrap();
    config.upload_tmp_dir = tmp_dir.to_path_buf();
    config
}

pub fn test_state(tmp_dir: &Path, fetcher: CountingFetcher, model: StubModel) -> AppState {
    let config = test_config(tmp_dir);
    AppState {
        extractor: Extractor::new(config.upload_tmp_dir.clone(), Duration::from_secs(30)),
        config,
        job_pages: Arc::new(fetcher),
        model: Arc::new(model),
    }
}

/// `POST /api/upload-cv` request carrying one `cvFile` part.
pub fn multipart_upload(file_name: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "cv-tailor-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"cvFile\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload-cv")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn escape_pdf_string(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Builds a valid PDF with one Helvetica text line per page.
pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        String::new(), // page tree, filled once page ids are known
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut kids = Vec::new();
    for text in pages {
        let page_id = objects.len() + 1;
        let content_id = page_id + 1;
        kids.push(format!("{page_id} 0 R"));
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        let stream = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", escape_pdf_string(text));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }
    objects[1] = format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    );

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
    }

    let xref_offset = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.extend_from_slice(xref.as_bytes());
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}

/// Builds a DOCX archive with one plain paragraph per entry.
pub fn minimal_docx(paragraphs: &[&str]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;

    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer
        .write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#,
        )
        .unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
