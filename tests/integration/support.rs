use async_trait::async_trait;
use scrape_sentry::pipeline::{Fetcher, ScrapeOrchestrator};
use scrape_sentry::{FetchError, JsonFileStore, SlidingWindowLimiter};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const PAGE: &str = r#"
<html>
  <head><title>Test</title></head>
  <body>
    <h1>Heading</h1>
    <p>Paragraph</p>
    <a href="https://example.com">Link</a>
  </body>
</html>
"#;

/// Serves canned HTML per URL; unknown URLs fail like an unreachable host
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        let key = Url::parse(url).expect("stub url").to_string();
        self.pages.insert(key, html.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError {
                url: url.to_string(),
                cause: "getaddrinfo ENOTFOUND".to_string(),
            })
    }
}

pub fn orchestrator(
    fetcher: Arc<StubFetcher>,
    output_dir: &Path,
    max_requests: u32,
    window: Duration,
) -> ScrapeOrchestrator {
    ScrapeOrchestrator::new(
        Arc::new(SlidingWindowLimiter::new(max_requests, window)),
        fetcher,
        Arc::new(JsonFileStore::new(output_dir, "scraped-data")),
    )
}
