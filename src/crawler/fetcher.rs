//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests for listing pages
//! - Spacing consecutive requests by a minimum delay
//! - Error classification

use crate::config::{Config, UserAgentConfig};
use crate::crawler::source::PageSource;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use espi_watch::config::UserAgentConfig;
/// use espi_watch::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body, treating every non-2xx status as an error
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let classify = |e: reqwest::Error| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                source: e,
            }
        }
    };

    let response = client.get(url).send().await.map_err(classify)?;
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(classify)
}

/// Page source fetching listing pages over HTTP
pub struct HttpPageSource {
    client: Client,
    minimum_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpPageSource {
    pub fn new(client: Client, minimum_delay: Duration) -> Self {
        Self {
            client,
            minimum_delay,
            last_request: Mutex::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = build_http_client(&config.user_agent).map_err(FetchError::Client)?;
        Ok(Self::new(
            client,
            Duration::from_millis(config.fetch.minimum_time_between_requests),
        ))
    }

    /// Sleeps until the minimum delay since the previous request has passed
    async fn wait_turn(&self) {
        let mut last_request = self.last_request.lock().await;
        let wait = remaining_delay(*last_request, Instant::now(), self.minimum_delay);
        if !wait.is_zero() {
            tracing::trace!("Waiting {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }
        *last_request = Some(Instant::now());
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.wait_turn().await;
        fetch_page(&self.client, url).await
    }
}

/// Time still to wait before a request made at `now` is allowed
fn remaining_delay(last_request: Option<Instant>, now: Instant, minimum: Duration) -> Duration {
    match last_request {
        Some(last) => minimum.saturating_sub(now.saturating_duration_since(last)),
        None => Duration::ZERO,
    }
}
