//! Request handlers for the scrape and health routes

use crate::pipeline::ScrapeOutcome;
use crate::server::AppState;
use crate::ScrapeError;
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;

/// Body of `POST /scraper/scrape`
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: String,
}

/// Runs one scrape for the calling client
///
/// An unreadable body is treated as an empty URL so that admission still runs
/// before the request is rejected.
pub async fn scrape(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeOutcome>, ScrapeError> {
    let client = client_key(&headers, peer, state.trust_forwarded_for);

    let url = match body {
        Ok(Json(request)) => request.url,
        Err(rejection) => {
            tracing::debug!(client = %client, "Unreadable scrape request body: {}", rejection);
            String::new()
        }
    };

    let outcome = state.orchestrator.run(&url, &client).await?;
    Ok(Json(outcome))
}

/// Liveness probe
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime": state.started_at.elapsed().as_secs_f64(),
    }))
}

/// Derives the rate-limit key for a request
///
/// The peer IP is used unless `trust_forwarded_for` is set and the request
/// carries an `X-Forwarded-For` header, in which case its first entry wins.
pub fn client_key(headers: &HeaderMap, peer: SocketAddr, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(forwarded) = forwarded {
            return forwarded.to_string();
        }
    }

    peer.ip().to_string()
}
