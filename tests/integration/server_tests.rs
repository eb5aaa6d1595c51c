use crate::support::{orchestrator, StubFetcher, PAGE};
use axum::body::{to_bytes, Body};
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use scrape_sentry::server::{router, AppState};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(dir: &TempDir, max_requests: u32) -> Router {
    let fetcher = Arc::new(StubFetcher::default().with_page("https://example.com/", PAGE));
    let orchestrator = orchestrator(fetcher, dir.path(), max_requests, Duration::from_secs(60));
    let state = AppState::new(Arc::new(orchestrator), true);

    router(state).layer(MockConnectInfo(SocketAddr::from(([203, 0, 113, 7], 40_000))))
}

fn scrape_request(body: &str, client: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/scraper/scrape")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", client)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir, 5)
        .oneshot(
            Request::builder()
                .uri("/scraper/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_scrape_success_response() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir, 5)
        .oneshot(scrape_request(r#"{"url":"https://example.com/"}"#, "198.51.100.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let file_path = body["filePath"].as_str().unwrap();
    assert!(std::path::Path::new(file_path).exists());
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Data successfully written to scraped-data-example.com-"));
}

#[tokio::test]
async fn test_unsafe_url_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir, 5)
        .oneshot(scrape_request(r#"{"url":"https://192.168.1.1/"}"#, "198.51.100.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("private"));
}

#[tokio::test]
async fn test_missing_or_malformed_body_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, 5);

    for body in ["{}", "not json", r#"{"url": 42}"#] {
        let response = app
            .clone()
            .oneshot(scrape_request(body, "198.51.100.1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        let json = json_body(response).await;
        assert_eq!(json["error"], "URL is required");
    }
}

#[tokio::test]
async fn test_fetch_failure_is_bad_gateway() {
    let dir = TempDir::new().unwrap();
    let response = app(&dir, 5)
        .oneshot(scrape_request(r#"{"url":"https://missing.example/"}"#, "198.51.100.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("https://missing.example/"));
}

#[tokio::test]
async fn test_rate_limit_end_to_end() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir, 5);
    let body = r#"{"url":"https://example.com/"}"#;

    for i in 0..5 {
        let response = app
            .clone()
            .oneshot(scrape_request(body, "client-a"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "request {}", i + 1);
    }

    let response = app
        .clone()
        .oneshot(scrape_request(body, "client-a"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    let json = json_body(response).await;
    assert_eq!(
        json["error"],
        "Rate limit exceeded. Max 5 requests per 60s."
    );

    let response = app
        .clone()
        .oneshot(scrape_request(body, "client-b"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
