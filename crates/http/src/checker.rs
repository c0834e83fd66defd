//! HTTP liveness checking for extracted URLs.
//!
//! Each URL gets one HEAD probe, escalated to a single-byte ranged GET when
//! the HEAD response is anything but a clean 200 or 404. Transport failures
//! map to a fixed taxonomy of operator-readable notes. Checks run through a
//! bounded-concurrency stream; one URL's failure never affects another's.

use futures::{stream, StreamExt};
use reqwest::{header, redirect, Client};
use std::time::Duration;
use urlcheck_core::{CheckResult, ResponseStatus, UrlLocation, UrlMap};

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from setting up the checker.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Browser User-Agent sent with every request. Some servers answer probes
/// from unknown agents with 403s that a reader of the deck would never see.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

const NOTE_NOT_FOUND: &str =
    "The URL returned a 404 File Not Found response (no such page on the server).";
const NOTE_FORBIDDEN: &str =
    "The URL returned a 403 Forbidden error (the server refuses to authorize the URL request).";
const NOTE_BAD_REQUEST: &str = "The URL returned a 400 Bad Request error \
(the URL may not be intended to be visited using a standard browser).";
const NOTE_HTTP_ERROR: &str = "An unspecified HTTP error occurred.";
const NOTE_CONNECTION: &str = "A connection error occurred (possible bad hostname).";
const NOTE_CONNECT_TIMEOUT: &str = "A timeout error occurred creating a connection to the \
server (possible slow server or slow internet connection).";
const NOTE_READ_TIMEOUT: &str =
    "A timeout error occurred when waiting for a read response from the server.";
const NOTE_INVALID_URL: &str = "The URL is not valid.";
const NOTE_TOO_MANY_REDIRECTS: &str =
    "A connection error occurred from too many server redirects.";

/// Tunables for the validation engine. Defaults match the historical tool.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Per-request timeout (connect and read).
    pub timeout: Duration,

    /// Maximum redirect hops before giving up.
    pub max_redirects: usize,

    /// Maximum in-flight requests.
    pub concurrency: usize,

    /// User-Agent header value.
    pub user_agent: String,

    /// Skip certificate verification. On by default: the check answers "is
    /// this page reachable", not "is its certificate chain trustworthy",
    /// and decks routinely link hosts with broken chains that still serve
    /// content. An explicit choice, not an oversight.
    pub accept_invalid_certs: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 10,
            concurrency: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: true,
        }
    }
}

/// Bounded-concurrency URL validator.
pub struct UrlChecker {
    client: Client,
    concurrency: usize,
}

impl UrlChecker {
    /// Build a checker from config. The client is constructed once and
    /// shared by every check.
    pub fn new(config: CheckerConfig) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            client,
            concurrency: config.concurrency.max(1),
        })
    }

    /// Check every URL in the map, returning exactly one result per URL.
    ///
    /// `on_progress` is invoked with the completed-check count as results
    /// arrive (completion order, not report order).
    pub async fn check_all<F>(&self, urls: &UrlMap, mut on_progress: F) -> Vec<CheckResult>
    where
        F: FnMut(usize),
    {
        let mut checks = stream::iter(urls.iter())
            .map(|(url, location)| self.check_one(url, location))
            .buffer_unordered(self.concurrency);

        let mut results = Vec::with_capacity(urls.len());
        while let Some(result) = checks.next().await {
            results.push(result);
            on_progress(results.len());
        }

        results
    }

    /// Validate a single URL.
    async fn check_one(&self, url: &str, location: UrlLocation) -> CheckResult {
        // HEAD first; cheap, and most servers answer it honestly.
        let mut head_status = None;
        match self.client.head(url).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                if code == 200 {
                    return CheckResult::new(location, url, ResponseStatus::Code(200));
                }
                if code == 404 {
                    // A clean 404 from HEAD is definitive.
                    return CheckResult::with_note(
                        location,
                        url,
                        ResponseStatus::Code(404),
                        NOTE_NOT_FOUND,
                    );
                }
                head_status = Some(code);
            }
            Err(e) => {
                log::debug!("HEAD {} failed, retrying as GET: {}", url, e);
            }
        }

        // Some servers mishandle HEAD (microsoft.com returns 404). Rule that
        // out with a GET; the Range header keeps the transfer to one byte
        // since only the status matters.
        match self
            .client
            .get(url)
            .header(header::RANGE, "bytes=0-0")
            .send()
            .await
        {
            Ok(response) => {
                let code = response.status().as_u16();
                // 206 Partial Content is the expected answer to our Range
                // request; report it as a success.
                let code = if code == 206 { 200 } else { code };
                CheckResult::with_note(
                    location,
                    url,
                    ResponseStatus::Code(code),
                    note_for_status(code),
                )
            }
            Err(e) => {
                // Report the HEAD status if we ever saw one; otherwise no
                // usable response was obtained.
                let status = match head_status {
                    Some(code) => ResponseStatus::Code(code),
                    None => ResponseStatus::NoResponse,
                };
                CheckResult::with_note(location, url, status, classify_error(&e))
            }
        }
    }
}

/// Fixed notes for the status codes operators care about.
fn note_for_status(code: u16) -> &'static str {
    match code {
        404 => NOTE_NOT_FOUND,
        403 => NOTE_FORBIDDEN,
        400 => NOTE_BAD_REQUEST,
        _ => "",
    }
}

/// Map a transport failure to its diagnostic note.
fn classify_error(e: &reqwest::Error) -> String {
    let note = if e.is_timeout() {
        if e.is_connect() {
            NOTE_CONNECT_TIMEOUT
        } else {
            NOTE_READ_TIMEOUT
        }
    } else if e.is_connect() {
        NOTE_CONNECTION
    } else if e.is_redirect() {
        NOTE_TOO_MANY_REDIRECTS
    } else if e.is_builder() {
        NOTE_INVALID_URL
    } else if e.is_request() {
        NOTE_HTTP_ERROR
    } else {
        return format!("Unrecognized error accessing URL: {}", e);
    };

    note.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_for_status() {
        assert_eq!(note_for_status(404), NOTE_NOT_FOUND);
        assert_eq!(note_for_status(403), NOTE_FORBIDDEN);
        assert_eq!(note_for_status(400), NOTE_BAD_REQUEST);
        assert_eq!(note_for_status(200), "");
        assert_eq!(note_for_status(500), "");
    }

    #[test]
    fn test_config_defaults_match_historical_tool() {
        let config = CheckerConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.concurrency, 20);
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let checker = UrlChecker::new(CheckerConfig {
            concurrency: 0,
            ..CheckerConfig::default()
        })
        .unwrap();
        assert_eq!(checker.concurrency, 1);
    }
}
