//! URL handling module for Scrape-Sentry
//!
//! This module provides the SSRF safety check applied to every scrape target
//! and the host helpers used to name stored artifacts.

mod domain;
mod safety;

// Re-export main functions
pub use domain::{extract_host, sanitize_host};
pub use safety::{check_url, is_safe};
