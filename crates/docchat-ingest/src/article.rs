//! Article download and body-text extraction
//!
//! Downloads a URL with reqwest and extracts readable body text from the
//! HTML with scraper. Prefers `<article>` content, then paragraph elements,
//! then the whole `<body>` as a last resort.

use crate::{IngestError, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;

static URL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Find the first URL-shaped substring in free text.
///
/// A substring is URL-shaped if it matches `http://` or `https://` followed
/// immediately by one or more non-whitespace characters. The matched
/// substring, not the whole input, is the fetch target.
pub fn extract_url(input: &str) -> Option<&str> {
    let re = URL_PATTERN.get_or_init(|| Regex::new(r"https?://\S+").expect("static pattern"));
    re.find(input).map(|m| m.as_str())
}

/// Source of article body text, keyed by URL.
///
/// Kept as a trait so the HTTP implementation can be swapped out in tests.
#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    /// Download and parse the article at `url`, returning its body text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP-backed article fetcher
pub struct HttpArticleFetcher {
    client: reqwest::Client,
}

impl HttpArticleFetcher {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("docchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

#[async_trait::async_trait]
impl ArticleSource for HttpArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| IngestError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IngestError::Fetch(format!(
                "server returned {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| IngestError::Fetch(e.to_string()))?;

        // scraper's DOM is not Send; parse synchronously so nothing
        // non-Send lives across an await point.
        let text = extract_article_text(&html)?;
        tracing::debug!("extracted {} chars of article text", text.len());

        Ok(text)
    }
}

/// Extract readable article text from an HTML document.
pub fn extract_article_text(html: &str) -> Result<String> {
    let document = Html::parse_document(html);

    let article_paragraphs = Selector::parse("article p").expect("static selector");
    let paragraphs = Selector::parse("p").expect("static selector");
    let body = Selector::parse("body").expect("static selector");

    let text = collect_text(&document, &article_paragraphs);
    if !text.is_empty() {
        return Ok(text);
    }

    let text = collect_text(&document, &paragraphs);
    if !text.is_empty() {
        return Ok(text);
    }

    // Last resort: every text node under <body>
    if let Some(body_el) = document.select(&body).next() {
        let mut content = String::new();
        for fragment in body_el.text() {
            let trimmed = fragment.trim();
            if !trimmed.is_empty() {
                if !content.is_empty() {
                    content.push(' ');
                }
                content.push_str(trimmed);
            }
        }
        if !content.is_empty() {
            return Ok(content);
        }
    }

    Err(IngestError::Parse(
        "no readable text found in document".to_string(),
    ))
}

/// Join the text of all elements matching `selector`, one per line.
fn collect_text(document: &Html, selector: &Selector) -> String {
    let mut content = String::new();
    for element in document.select(selector) {
        let piece: String = element.text().collect::<Vec<_>>().join(" ");
        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            if !content.is_empty() {
                content.push('\n');
            }
            content.push_str(trimmed);
        }
    }
    content
}
