//! Scrape pipeline module
//!
//! This module contains the request pipeline, including:
//! - HTTP fetching with a hard timeout and safe redirects
//! - HTML extraction into a structured document
//! - Orchestration of admission, validation, fetch, extraction and storage

mod extractor;
mod fetcher;
mod orchestrator;

pub use extractor::{extract, ScrapedDocument, ScrapedLink};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher, MAX_REDIRECTS};
pub use orchestrator::{ScrapeOrchestrator, ScrapeOutcome};
