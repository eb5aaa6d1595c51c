//! Scrape-Sentry: a guarded single-page scraper
//!
//! This crate fetches one HTML page per request, extracts its title, headings,
//! paragraphs and links, and stores the result as a JSON artifact. Every request
//! passes a per-client sliding-window rate limiter and an SSRF check before any
//! outbound call is made.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod ratelimit;
pub mod server;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Error returned by a scrape request
///
/// Each variant aborts only the current request and carries enough context for
/// the caller to correct the input or retry later.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{reason}")]
    Validation { reason: String },

    #[error("Rate limit exceeded. Max {max_requests} requests per {}s.", .window.as_secs_f64())]
    RateLimited {
        max_requests: u32,
        window: Duration,
        retry_after: Duration,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl From<UrlError> for ScrapeError {
    fn from(err: UrlError) -> Self {
        ScrapeError::Validation {
            reason: err.to_string(),
        }
    }
}

/// A failed outbound fetch
#[derive(Debug, Error)]
#[error("Failed to fetch URL {url}: {cause}")]
pub struct FetchError {
    pub url: String,
    pub cause: String,
}

/// A failed artifact write
#[derive(Debug, Error)]
#[error("Failed to write artifact: {cause}")]
pub struct PersistError {
    pub cause: String,
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        PersistError {
            cause: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError {
            cause: err.to_string(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("URL is required")]
    Missing,

    #[error("Invalid URL format: {0}")]
    Parse(String),

    #[error("URL must be HTTPS, got scheme '{0}'")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("URL must not point to a private or internal address: {0}")]
    BlockedHost(String),
}

/// Result type alias for scrape requests
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use output::{Artifact, ArtifactStore, JsonFileStore};
pub use pipeline::{
    extract, Fetcher, HttpFetcher, ScrapeOrchestrator, ScrapeOutcome, ScrapedDocument,
};
pub use ratelimit::{Admission, SlidingWindowLimiter};
pub use crate::url::{check_url, is_safe};
