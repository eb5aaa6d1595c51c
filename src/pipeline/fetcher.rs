//! HTTP fetcher implementation
//!
//! This module handles the single outbound request made per scrape:
//! - Building the HTTP client with the configured user agent and timeout
//! - Re-checking every redirect hop against the URL safety rules
//! - Turning transport, status and decoding failures into `FetchError`

use crate::config::ScraperConfig;
use crate::url::check_url;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::error::Error as StdError;
use std::time::Duration;
use url::Url;

/// Maximum number of redirect hops followed for one fetch
pub const MAX_REDIRECTS: usize = 10;

/// Source of raw HTML for a validated URL
///
/// Implementations make exactly one attempt per call; retry policy belongs to
/// the caller.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - Value sent as the `User-Agent` header
/// * `timeout` - Hard deadline covering connect, headers and body
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(safe_redirect_policy())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Follows redirects only while each target passes [`check_url`]
fn safe_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error(format!("too many redirects (max {})", MAX_REDIRECTS));
        }

        match check_url(attempt.url().as_str()) {
            Ok(_) => attempt.follow(),
            Err(e) => {
                tracing::warn!(target_url = %attempt.url(), "Refusing unsafe redirect: {}", e);
                attempt.error(e)
            }
        }
    })
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
            timeout,
        })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.user_agent, config.timeout())
    }

    fn error_for(&self, url: &Url, err: reqwest::Error) -> FetchError {
        let cause = if err.is_timeout() {
            format!("request timed out after {}ms", self.timeout.as_millis())
        } else {
            error_chain(&err)
        };

        FetchError {
            url: url.to_string(),
            cause,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL and returns its body as text
    ///
    /// # Failure Modes
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `FetchError`, no retry |
    /// | Connection refused / TLS error | `FetchError`, no retry |
    /// | Redirect to an unsafe URL | `FetchError` |
    /// | HTTP 4xx / 5xx | `FetchError` with the status |
    /// | Undecodable body | `FetchError` |
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| self.error_for(url, e))?;

        let body = response.text().await.map_err(|e| self.error_for(url, e))?;

        tracing::debug!(url = %url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Renders an error together with its sources, outermost first
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
