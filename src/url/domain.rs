use url::Url;

/// Extracts the host from a URL
///
/// The host is converted to lowercase. If the URL has no host (which shouldn't
/// happen for URLs that passed [`check_url`](super::check_url)), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use scrape_sentry::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Makes a host safe to embed in a file name
///
/// Every character outside `[A-Za-z0-9.-]` is replaced with `-`.
///
/// # Examples
///
/// ```
/// use scrape_sentry::url::sanitize_host;
///
/// assert_eq!(sanitize_host("example.com"), "example.com");
/// assert_eq!(sanitize_host("[::1]"), "---1-");
/// ```
pub fn sanitize_host(host: &str) -> String {
    host.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
