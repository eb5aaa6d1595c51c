//! Integration tests for the scrape pipeline and HTTP surface
//!
//! The network is replaced by a stub fetcher so the tests can use public
//! HTTPS URLs, which the safety check requires, without leaving the process.

mod pipeline_tests;
mod server_tests;
mod support;
