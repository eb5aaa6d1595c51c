//! Configuration module for Scrape-Sentry
//!
//! This module handles loading, parsing, and validating configuration. Values
//! come from built-in defaults, an optional TOML file and environment
//! variables, in that order of precedence (later wins).
//!
//! # Example
//!
//! ```no_run
//! use scrape_sentry::config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("Listening on port {}", config.server.port);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, RateLimitConfig, ScraperConfig, ServerConfig};

// Re-export parser functions
pub use parser::{apply_env_overrides, load_config, parse_config};
pub use validation::validate;
