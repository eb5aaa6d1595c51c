use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Loads the effective configuration
///
/// Layers are applied in order: built-in defaults, the TOML file (if given),
/// then environment variable overrides. The result is validated.
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use scrape_sentry::config::load_config;
///
/// let config = load_config(Some(Path::new("scrape-sentry.toml"))).unwrap();
/// println!("Max requests: {}", config.rate_limit.max_requests);
/// ```
pub fn load_config(path: Option<&Path>) -> ConfigResult<Config> {
    let mut config = match path {
        Some(path) => parse_config(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    validate(&config)?;

    Ok(config)
}

/// Parses TOML content without validating it
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    Ok(toml::from_str(content)?)
}

/// Applies environment overrides using `lookup` to read variables
///
/// | Variable | Setting |
/// |----------|---------|
/// | `PORT` | `server.port` |
/// | `SCRAPER_TIMEOUT` | `scraper.timeout` |
/// | `USER_AGENT` | `scraper.user-agent` |
/// | `RATE_LIMIT_MAX_REQUESTS` | `rate-limit.max-requests` |
/// | `RATE_LIMIT_WINDOW_MS` | `rate-limit.window-ms` |
/// | `OUTPUT_DIRECTORY` | `output.directory` |
/// | `OUTPUT_FILE_PREFIX` | `output.file-name-prefix` |
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("PORT") {
        config.server.port = parse_number("PORT", &value)?;
    }
    if let Some(value) = lookup("SCRAPER_TIMEOUT") {
        config.scraper.timeout_ms = parse_number("SCRAPER_TIMEOUT", &value)?;
    }
    if let Some(value) = lookup("USER_AGENT") {
        config.scraper.user_agent = value;
    }
    if let Some(value) = lookup("RATE_LIMIT_MAX_REQUESTS") {
        config.rate_limit.max_requests = parse_number("RATE_LIMIT_MAX_REQUESTS", &value)?;
    }
    if let Some(value) = lookup("RATE_LIMIT_WINDOW_MS") {
        config.rate_limit.window_ms = parse_number("RATE_LIMIT_WINDOW_MS", &value)?;
    }
    if let Some(value) = lookup("OUTPUT_DIRECTORY") {
        config.output.directory = value;
    }
    if let Some(value) = lookup("OUTPUT_FILE_PREFIX") {
        config.output.file_name_prefix = value;
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!("{} must be a non-negative integer, got '{}'", key, value))
    })
}
