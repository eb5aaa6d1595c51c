//! Scrape orchestrator - request-scoped pipeline
//!
//! This module runs one scrape from start to finish:
//! - Admitting the client against its rate-limit quota
//! - Validating the target URL
//! - Fetching, extracting and storing the page
//!
//! Stages run strictly in order and the first failure aborts the rest.

use crate::config::Config;
use crate::output::{ArtifactStore, JsonFileStore};
use crate::pipeline::extractor::extract;
use crate::pipeline::fetcher::{Fetcher, HttpFetcher};
use crate::ratelimit::{Admission, SlidingWindowLimiter};
use crate::url::check_url;
use crate::ScrapeError;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Successful result of a scrape request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutcome {
    pub message: String,
    pub file_path: PathBuf,
}

/// Composes admission, validation, fetch, extraction and persistence
pub struct ScrapeOrchestrator {
    limiter: Arc<SlidingWindowLimiter>,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn ArtifactStore>,
}

impl ScrapeOrchestrator {
    pub fn new(
        limiter: Arc<SlidingWindowLimiter>,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            limiter,
            fetcher,
            store,
        }
    }

    /// Builds the production pipeline: reqwest fetcher and JSON file store
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeOrchestrator)` - Ready to serve requests
    /// * `Err(reqwest::Error)` - The HTTP client could not be built
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let limiter = SlidingWindowLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit.window(),
        );
        let fetcher = HttpFetcher::from_config(&config.scraper)?;
        let store = JsonFileStore::from_config(&config.output);

        Ok(Self::new(
            Arc::new(limiter),
            Arc::new(fetcher),
            Arc::new(store),
        ))
    }

    pub fn limiter(&self) -> &Arc<SlidingWindowLimiter> {
        &self.limiter
    }

    /// Runs the full pipeline for one request
    ///
    /// # Arguments
    ///
    /// * `url` - The raw target URL as received from the caller
    /// * `client_key` - Identifier of the caller for rate limiting
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeOutcome)` - The page was fetched, extracted and stored
    /// * `Err(ScrapeError)` - Exactly one of the four failure kinds
    pub async fn run(&self, url: &str, client_key: &str) -> crate::Result<ScrapeOutcome> {
        self.admit(client_key)?;

        let target = check_url(url).map_err(|e| {
            tracing::info!(client = client_key, url, "Rejected unsafe URL: {}", e);
            ScrapeError::from(e)
        })?;

        let html = self.fetcher.fetch(&target).await.map_err(|e| {
            tracing::warn!(url = %target, "Fetch failed: {}", e.cause);
            ScrapeError::from(e)
        })?;

        let document = extract(&html);
        tracing::debug!(
            url = %target,
            headings = document.headings.len(),
            paragraphs = document.paragraphs.len(),
            links = document.links.len(),
            "Extracted document"
        );

        let artifact = self.store.save(&document, &target).await?;

        Ok(ScrapeOutcome {
            message: format!("Data successfully written to {}", artifact.file_name()),
            file_path: artifact.path,
        })
    }

    fn admit(&self, client_key: &str) -> crate::Result<()> {
        match self.limiter.admit(client_key, Instant::now()) {
            Admission::Admitted => Ok(()),
            Admission::Rejected { retry_after } => Err(ScrapeError::RateLimited {
                max_requests: self.limiter.max_requests(),
                window: self.limiter.window(),
                retry_after,
            }),
        }
    }
}
