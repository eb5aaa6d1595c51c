use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Scrape-Sentry
///
/// Every section is optional in the TOML file; missing sections and keys take
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default, rename = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Use the first `X-Forwarded-For` entry as the client key when present
    #[serde(rename = "trust-forwarded-for")]
    pub trust_forwarded_for: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            trust_forwarded_for: false,
        }
    }
}

/// Outbound fetch configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Fetch deadline (milliseconds)
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,

    /// Value of the outbound `User-Agent` header
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

/// Per-client admission quota
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per window for one client
    #[serde(rename = "max-requests")]
    pub max_requests: u32,

    /// Length of the sliding window (milliseconds)
    #[serde(rename = "window-ms")]
    pub window_ms: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_ms: 60_000,
        }
    }
}

/// Artifact location policy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory artifacts are written to, created on first save
    pub directory: String,

    /// Leading part of every artifact file name
    #[serde(rename = "file-name-prefix")]
    pub file_name_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            file_name_prefix: "scraped-data".to_string(),
        }
    }
}
