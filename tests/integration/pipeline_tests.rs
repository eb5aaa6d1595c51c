use crate::support::{orchestrator, StubFetcher, PAGE};
use scrape_sentry::pipeline::{ScrapedDocument, ScrapedLink};
use scrape_sentry::ScrapeError;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const WINDOW: Duration = Duration::from_millis(60_000);

#[tokio::test]
async fn test_scrape_writes_artifact() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(StubFetcher::default().with_page("https://example.com/", PAGE));
    let orchestrator = orchestrator(fetcher.clone(), dir.path(), 5, WINDOW);

    let outcome = orchestrator
        .run("https://example.com/", "client-a")
        .await
        .expect("scrape should succeed");

    assert_eq!(outcome.file_path.parent(), Some(dir.path()));
    let file_name = outcome.file_path.file_name().unwrap().to_string_lossy();
    assert!(file_name.starts_with("scraped-data-example.com-"));
    assert_eq!(
        outcome.message,
        format!("Data successfully written to {}", file_name)
    );

    let written = std::fs::read_to_string(&outcome.file_path).unwrap();
    let document: ScrapedDocument = serde_json::from_str(&written).unwrap();
    assert_eq!(
        document,
        ScrapedDocument {
            title: "Test".to_string(),
            headings: vec!["Heading".to_string()],
            paragraphs: vec!["Paragraph".to_string()],
            links: vec![ScrapedLink {
                href: "https://example.com".to_string(),
                text: "Link".to_string(),
            }],
        }
    );
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_quota_per_client() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(StubFetcher::default().with_page("https://example.com/", PAGE));
    let orchestrator = orchestrator(fetcher.clone(), dir.path(), 5, WINDOW);

    for i in 0..5 {
        let result = orchestrator.run("https://example.com/", "A").await;
        assert!(result.is_ok(), "request {} from A failed: {:?}", i + 1, result);
    }

    let err = orchestrator
        .run("https://example.com/", "A")
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::RateLimited { max_requests: 5, .. }));
    let message = err.to_string();
    assert!(message.contains('5'), "message was: {}", message);
    assert!(message.contains("60"), "message was: {}", message);

    assert!(orchestrator.run("https://example.com/", "B").await.is_ok());

    // The rejected request never reached the fetcher
    assert_eq!(fetcher.calls(), 6);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 6);
}

#[tokio::test]
async fn test_unsafe_urls_rejected_without_fetch() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(StubFetcher::default());
    let orchestrator = orchestrator(fetcher.clone(), dir.path(), 100, WINDOW);

    for url in [
        "http://example.com",
        "https://localhost",
        "https://127.0.0.1",
        "https://192.168.1.1",
        "https://10.0.0.5",
        "https://172.16.4.2",
        "not a url",
    ] {
        let err = orchestrator.run(url, "client").await.unwrap_err();
        assert!(
            matches!(err, ScrapeError::Validation { .. }),
            "{} gave {:?}",
            url,
            err
        );
    }

    assert_eq!(fetcher.calls(), 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_fetch_failure_reports_url_and_cause() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(StubFetcher::default());
    let orchestrator = orchestrator(fetcher, dir.path(), 5, WINDOW);

    let err = orchestrator
        .run("https://unreachable.example/", "client")
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Fetch(_)));
    assert_eq!(
        err.to_string(),
        "Failed to fetch URL https://unreachable.example/: getaddrinfo ENOTFOUND"
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_persist_failure() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, "not a directory").unwrap();

    let fetcher = Arc::new(StubFetcher::default().with_page("https://example.com/", PAGE));
    let orchestrator = orchestrator(fetcher, &blocker, 5, WINDOW);

    let err = orchestrator
        .run("https://example.com/", "client")
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::Persist(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_concurrent_requests_respect_quota() {
    let dir = TempDir::new().unwrap();
    let fetcher = Arc::new(StubFetcher::default().with_page("https://example.com/", PAGE));
    let orchestrator = Arc::new(orchestrator(fetcher, dir.path(), 5, WINDOW));

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.run("https://example.com/", "A").await })
        })
        .collect();

    let mut admitted = 0;
    let mut limited = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(ScrapeError::RateLimited { .. }) => limited += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(limited, 7);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 5);
}
