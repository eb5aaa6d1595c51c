use crate::config::types::{Config, OutputConfig, RateLimitConfig, ScraperConfig, ServerConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_scraper_config(&config.scraper)?;
    validate_rate_limit_config(&config.rate_limit)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    if config.port < 1000 {
        return Err(ConfigError::Validation(format!(
            "port must be between 1000 and 65535, got {}",
            config.port
        )));
    }

    Ok(())
}

/// Validates outbound fetch configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if !(1000..=30_000).contains(&config.timeout_ms) {
        return Err(ConfigError::Validation(format!(
            "timeout must be between 1000 and 30000ms, got {}ms",
            config.timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates rate limit configuration
fn validate_rate_limit_config(config: &RateLimitConfig) -> Result<(), ConfigError> {
    if !(1..=100).contains(&config.max_requests) {
        return Err(ConfigError::Validation(format!(
            "max_requests must be between 1 and 100, got {}",
            config.max_requests
        )));
    }

    if config.window_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "window_ms must be >= 1000ms, got {}ms",
            config.window_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "directory cannot be empty".to_string(),
        ));
    }

    validate_file_name_prefix(&config.file_name_prefix)
}

/// The prefix becomes part of a file name, so only `[A-Za-z0-9._-]` is allowed
fn validate_file_name_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::Validation(
            "file_name_prefix cannot be empty".to_string(),
        ));
    }

    if !prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "file_name_prefix must contain only letters, digits, '.', '_' and '-', got '{}'",
            prefix
        )));
    }

    if prefix == "." || prefix == ".." {
        return Err(ConfigError::Validation(format!(
            "file_name_prefix cannot be '{}'",
            prefix
        )));
    }

    Ok(())
}
