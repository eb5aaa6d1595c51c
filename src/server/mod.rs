//! HTTP server module
//!
//! Exposes the scrape pipeline over HTTP:
//! - `POST /scraper/scrape` runs one scrape for the calling client
//! - `GET /scraper/health` reports liveness and uptime
//!
//! The server also runs a background task that evicts idle clients from the
//! rate limiter once per window.

mod error;
mod handlers;

pub use handlers::{client_key, ScrapeRequest};

use crate::config::ServerConfig;
use crate::pipeline::ScrapeOrchestrator;
use crate::ratelimit::SlidingWindowLimiter;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ScrapeOrchestrator>,
    pub started_at: Instant,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(orchestrator: Arc<ScrapeOrchestrator>, trust_forwarded_for: bool) -> Self {
        Self {
            orchestrator,
            started_at: Instant::now(),
            trust_forwarded_for,
        }
    }
}

/// Builds the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/scraper/scrape", post(handlers::scrape))
        .route("/scraper/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C
///
/// # Arguments
///
/// * `config` - Server bind settings
/// * `orchestrator` - The pipeline every scrape request runs through
///
/// # Returns
///
/// * `Ok(())` - The server shut down gracefully
/// * `Err(std::io::Error)` - Binding or serving failed
pub async fn serve(config: &ServerConfig, orchestrator: ScrapeOrchestrator) -> std::io::Result<()> {
    let orchestrator = Arc::new(orchestrator);
    let sweeper = spawn_idle_sweeper(Arc::clone(orchestrator.limiter()));

    let state = AppState::new(orchestrator, config.trust_forwarded_for);
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    tracing::info!("POST /scraper/scrape  body: {{ \"url\": \"https://example.com\" }}");

    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    sweeper.abort();
    tracing::info!("Server stopped");
    result
}

/// Evicts clients with no requests left in the window, once per window
///
/// A zero window keeps no history worth sweeping, so the returned task exits
/// immediately.
pub fn spawn_idle_sweeper(limiter: Arc<SlidingWindowLimiter>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let window = limiter.window();
        if window.is_zero() {
            tracing::debug!("Zero rate-limit window, idle sweeper not started");
            return;
        }

        let mut ticker = tokio::time::interval(window);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.evict_idle(tokio::time::Instant::now().into_std());
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
