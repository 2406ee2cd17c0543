//! HTTP fetcher implementation
//!
//! This module performs the network side of a crawl job:
//! - Building an HTTP client that identifies the crawler
//! - Issuing one GET per job, bounded by a fixed timeout
//! - Handing the body to the content extractor
//! - Turning every transport failure into a `FetchResult::Failed` value

use crate::config::UserAgentConfig;
use crate::crawler::extractor::extract_content;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched and extracted page
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,

    /// HTTP status code (non-2xx responses with a body still count as pages)
    pub status_code: u16,

    /// Outbound links in extraction order
    pub links: Vec<String>,

    /// Plain text of the page
    pub text: String,
}

/// Result of a fetch operation
///
/// Every job produces exactly one of these. `Failed` is the no-op sentinel:
/// it carries no page, only enough context to log and count the failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    /// The page was retrieved and its content extracted
    Page(FetchedPage),

    /// Network error (timeout, DNS failure, connection refused, truncated body)
    Failed {
        /// The URL that could not be fetched
        url: String,
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if this result carries a page
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page(_))
    }

    /// The URL the job was for, whatever the outcome
    pub fn requested_url(&self) -> &str {
        match self {
            Self::Page(page) => &page.url,
            Self::Failed { url, .. } => url,
        }
    }
}

/// Source of pages for the worker pool
///
/// Implementations must return within a bounded time and must never panic on
/// network trouble; failures are reported as `FetchResult::Failed`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and extracts its links and text
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Upper bound for a whole request, body included
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_index::config::UserAgentConfig;
/// use sumi_index::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SumiIndex".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher that identifies itself with `config` and gives up after `timeout`
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and extracts its content
///
/// | Condition | Result |
/// |-----------|--------|
/// | Any response with a readable body | `Page` (status recorded, not judged) |
/// | Timeout | `Failed` |
/// | Connection refused / DNS failure | `Failed` |
/// | Body read error | `Failed` |
///
/// There are no retries.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::Failed {
                url: url.to_string(),
                error,
            };
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("{} answered with HTTP {}", url, status.as_u16());
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout while reading body".to_string()
            } else {
                format!("Failed to read body: {}", e)
            };
            return FetchResult::Failed {
                url: url.to_string(),
                error,
            };
        }
    };

    let content = extract_content(url, &body);

    FetchResult::Page(FetchedPage {
        url: url.to_string(),
        status_code: status.as_u16(),
        links: content.links,
        text: content.text,
    })
}
