//! HTTP error responses
//!
//! Maps each scrape failure kind to a status code and a `{"error": ...}` body.
//! Rate-limited responses also carry `Retry-After`.

use crate::ScrapeError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;

impl ScrapeError {
    /// HTTP status reported for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScrapeError::Validation { .. } => StatusCode::BAD_REQUEST,
            ScrapeError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ScrapeError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ScrapeError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));

        match self {
            ScrapeError::RateLimited { retry_after, .. } => (
                status,
                [(header::RETRY_AFTER, retry_after_secs(retry_after).to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

/// Whole seconds, rounded up so clients never retry too early
fn retry_after_secs(retry_after: Duration) -> u64 {
    retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0)
}
