//! Fetching web pages for URL references.
//!
//! One GET per URL with a fixed timeout and no retry. HTML bodies are reduced
//! to plain text; other text bodies are kept as-is.

use std::time::Duration;

use rahnuma_core::extract::strip_nul;
use rahnuma_core::html::{extract_title, html_to_text};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL '{0}': only http and https URLs are accepted")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Page has no readable text")]
    Empty,
}

/// A fetched page reduced to text.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

impl FetchedPage {
    /// Reference name: the page title, falling back to the URL.
    pub fn name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }
}

/// Accept only absolute `http`/`https` URLs with a host.
pub fn parse_http_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| FetchError::InvalidUrl(trimmed.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(FetchError::InvalidUrl(trimmed.to_string())),
    }
}

pub async fn fetch_page(
    client: &reqwest::Client,
    raw_url: &str,
    timeout: Duration,
) -> Result<FetchedPage, FetchError> {
    let url = parse_http_url(raw_url)?;
    tracing::debug!(%url, "Fetching reference URL");

    let response = client.get(url.clone()).timeout(timeout).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |ct| ct.contains("html"));
    let body = response.text().await?;

    let (title, text) = if is_html {
        (extract_title(&body), html_to_text(&body))
    } else {
        (None, strip_nul(&body).trim().to_string())
    };

    if text.is_empty() {
        return Err(FetchError::Empty);
    }

    Ok(FetchedPage {
        url: url.to_string(),
        title,
        text,
    })
}
