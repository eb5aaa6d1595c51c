//! Scrape-Sentry main entry point
//!
//! This is the command-line interface for the Scrape-Sentry page scraper.

use clap::{Parser, Subcommand};
use scrape_sentry::config::{load_config, Config};
use scrape_sentry::pipeline::ScrapeOrchestrator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scrape-Sentry: a guarded single-page scraper
///
/// Scrape-Sentry fetches a page, extracts its title, headings, paragraphs
/// and links, and stores them as JSON. Requests are rate limited per client
/// and URLs pointing at internal addresses are refused.
#[derive(Parser, Debug)]
#[command(name = "scrape-sentry")]
#[command(version = "1.0.0")]
#[command(about = "A guarded single-page scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve,

    /// Scrape a single URL and print the result
    Scrape {
        /// The page to scrape (must be HTTPS and public)
        url: String,

        /// Client key to charge the request to
        #[arg(long, default_value = "cli")]
        client: String,
    },

    /// Validate the configuration and print the effective values
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Failed to load .env file: {}", e);
        }
    }

    // Load and validate configuration
    let config = match load_config(cli.config.as_deref()) {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Serve => handle_serve(config).await?,
        Command::Scrape { url, client } => handle_scrape(&config, &url, &client).await?,
        Command::CheckConfig => handle_check_config(&config),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scrape_sentry=info,tower_http=info,warn"),
            1 => EnvFilter::new("scrape_sentry=debug,tower_http=debug,info"),
            2 => EnvFilter::new("scrape_sentry=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `serve`: runs the HTTP server until interrupted
async fn handle_serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Rate limiter: max {} requests per {}s",
        config.rate_limit.max_requests,
        config.rate_limit.window().as_secs_f64()
    );
    tracing::info!("Artifacts will be written to {}", config.output.directory);

    let orchestrator = ScrapeOrchestrator::from_config(&config)?;
    scrape_sentry::server::serve(&config.server, orchestrator).await?;

    Ok(())
}

/// Handles `scrape`: runs one pipeline in-process
async fn handle_scrape(
    config: &Config,
    url: &str,
    client: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = ScrapeOrchestrator::from_config(config)?;

    match orchestrator.run(url, client).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles `check-config`: shows the effective configuration
fn handle_check_config(config: &Config) {
    println!("=== Scrape-Sentry Configuration ===\n");

    println!("Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!(
        "  Trust X-Forwarded-For: {}",
        config.server.trust_forwarded_for
    );

    println!("\nScraper:");
    println!("  Timeout: {}ms", config.scraper.timeout_ms);
    println!("  User agent: {}", config.scraper.user_agent);

    println!("\nRate Limit:");
    println!("  Max requests: {}", config.rate_limit.max_requests);
    println!("  Window: {}ms", config.rate_limit.window_ms);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  File name prefix: {}", config.output.file_name_prefix);

    println!("\n✓ Configuration is valid");
}
