use crate::{UrlError, UrlResult};
use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

/// Checks that a URL is safe to fetch and returns it parsed
///
/// # Rules
///
/// Applied in order, the first failure wins:
///
/// 1. The input must parse as an absolute URL
/// 2. The scheme must be exactly `https`
/// 3. The host must not be `localhost` (including `localhost.` and `*.localhost`),
///    a loopback address (`127.0.0.0/8`, `::1`) or unspecified (`0.0.0.0`, `::`)
/// 4. The host must not be an IPv4 address in `10.0.0.0/8`, `172.16.0.0/12`
///    or `192.168.0.0/16`
///
/// # Arguments
///
/// * `input` - The raw URL string
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL, safe to fetch
/// * `Err(UrlError)` - The reason the URL was rejected
///
/// # Examples
///
/// ```
/// use scrape_sentry::url::check_url;
///
/// assert!(check_url("https://example.com/page").is_ok());
/// assert!(check_url("http://example.com/page").is_err());
/// assert!(check_url("https://192.168.1.1/").is_err());
/// ```
pub fn check_url(input: &str) -> UrlResult<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Missing);
    }

    let url = Url::parse(input).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host() {
        None => Err(UrlError::MissingHost),
        Some(Host::Domain(domain)) if is_localhost(domain) => {
            Err(UrlError::BlockedHost(domain.to_string()))
        }
        Some(Host::Ipv4(addr)) if is_blocked_ipv4(addr) => {
            Err(UrlError::BlockedHost(addr.to_string()))
        }
        Some(Host::Ipv6(addr)) if is_blocked_ipv6(addr) => {
            Err(UrlError::BlockedHost(addr.to_string()))
        }
        Some(_) => Ok(url),
    }
}

/// Returns true if the URL passes every rule of [`check_url`]
pub fn is_safe(input: &str) -> bool {
    check_url(input).is_ok()
}

/// `localhost`, its fully-qualified form and any name under it
fn is_localhost(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain).to_ascii_lowercase();
    domain == "localhost" || domain.ends_with(".localhost")
}

/// Loopback, unspecified and the RFC 1918 private ranges
fn is_blocked_ipv4(addr: Ipv4Addr) -> bool {
    let [a, b, _, _] = addr.octets();

    addr.is_loopback()
        || addr.is_unspecified()
        || a == 10
        || (a == 172 && (16..=31).contains(&b))
        || (a == 192 && b == 168)
}

fn is_blocked_ipv6(addr: Ipv6Addr) -> bool {
    if addr.is_loopback() || addr.is_unspecified() {
        return true;
    }
    // IPv4-mapped (::ffff:a.b.c.d)
    addr.to_ipv4_mapped().is_some_and(is_blocked_ipv4)
}
