use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use super::{JobPageFetcher, ScrapeError};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Scrapes a job page over HTTP and returns the text of the description node.
#[derive(Clone)]
pub struct HttpJobPageFetcher {
    client: Client,
    selector: String,
}

impl HttpJobPageFetcher {
    pub fn new(selector: &str, timeout: Duration) -> Result<Self, ScrapeError> {
        Selector::parse(selector).map_err(|_| ScrapeError::Selector(selector.to_string()))?;

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            selector: selector.to_string(),
        })
    }
}

#[async_trait]
impl JobPageFetcher for HttpJobPageFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch_description(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        debug!(bytes = html.len(), "Fetched job page");

        extract_node_text(&html, &self.selector)
    }
}

/// Text content of the first node matching `selector`, trimmed.
pub fn extract_node_text(html: &str, selector: &str) -> Result<String, ScrapeError> {
    let selector_parsed =
        Selector::parse(selector).map_err(|_| ScrapeError::Selector(selector.to_string()))?;
    let document = Html::parse_document(html);

    document
        .select(&selector_parsed)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ScrapeError::MissingNode(selector.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::{http::HeaderMap, http::StatusCode, response::Html as HtmlBody, routing::get, Router};

    use super::*;
    use crate::test_support::spawn_stub;

    const INDEED_PAGE: &str = r#"<html><body>
        <h1>Backend Engineer</h1>
        <div id="jobDescriptionText">
            <p>Seeking engineer with <b>Rust</b> experience.</p>
            <ul><li>Build APIs</li></ul>
        </div>
    </body></html>"#;

    async fn job_board() -> std::net::SocketAddr {
        async fn echo_agent(headers: HeaderMap) -> HtmlBody<String> {
            let agent = headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            HtmlBody(format!(r#"<div id="jobDescriptionText">{agent}</div>"#))
        }

        let router = Router::new()
            .route("/viewjob", get(|| async { HtmlBody(INDEED_PAGE) }))
            .route("/agent", get(echo_agent))
            .route(
                "/empty",
                get(|| async { HtmlBody("<html><body><p>Nothing here</p></body></html>") }),
            )
            .route("/gone", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    HtmlBody(INDEED_PAGE)
                }),
            );
        spawn_stub(router).await
    }

    fn fetcher(timeout: Duration) -> HttpJobPageFetcher {
        HttpJobPageFetcher::new("#jobDescriptionText", timeout).unwrap()
    }

    #[test]
    fn test_extract_node_text_concatenates_descendants() {
        let text = extract_node_text(INDEED_PAGE, "#jobDescriptionText").unwrap();
        assert!(text.starts_with("Seeking engineer with Rust experience."));
        assert!(text.ends_with("Build APIs"));
    }

    #[test]
    fn test_extract_node_text_missing_node() {
        let err = extract_node_text("<p>hi</p>", "#jobDescriptionText").unwrap_err();
        assert!(matches!(err, ScrapeError::MissingNode(_)));
    }

    #[test]
    fn test_invalid_selector_is_rejected_at_construction() {
        let err = HttpJobPageFetcher::new("##", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, ScrapeError::Selector(_)));
    }

    #[tokio::test]
    async fn test_fetches_description_node() {
        let addr = job_board().await;
        let text = fetcher(Duration::from_secs(5))
            .fetch_description(&format!("http://{addr}/viewjob"))
            .await
            .unwrap();
        assert!(text.contains("Seeking engineer"));
    }

    #[tokio::test]
    async fn test_sends_browser_user_agent() {
        let addr = job_board().await;
        let text = fetcher(Duration::from_secs(5))
            .fetch_description(&format!("http://{addr}/agent"))
            .await
            .unwrap();
        assert_eq!(text, BROWSER_USER_AGENT);
    }

    #[tokio::test]
    async fn test_page_without_node() {
        let addr = job_board().await;
        let err = fetcher(Duration::from_secs(5))
            .fetch_description(&format!("http://{addr}/empty"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::MissingNode(_)));
    }

    #[tokio::test]
    async fn test_error_status() {
        let addr = job_board().await;
        let err = fetcher(Duration::from_secs(5))
            .fetch_description(&format!("http://{addr}/gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Status(404)));
    }

    #[tokio::test]
    async fn test_slow_page_times_out() {
        let addr = job_board().await;
        let err = fetcher(Duration::from_millis(200))
            .fetch_description(&format!("http://{addr}/slow"))
            .await
            .unwrap_err();
        match err {
            ScrapeError::Request(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
