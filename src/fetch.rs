//! Page fetching with an explicit client and optional retry logic.
//!
//! All network I/O goes through the [`FetchPage`] trait so scrapers can be
//! exercised against canned HTML in tests. The trait has two implementations:
//!
//! - [`HttpFetcher`]: a `reqwest::Client` constructed once with browser-like
//!   headers and a bounded per-request timeout, owned by the orchestrator for
//!   the life of the run.
//! - [`RetryFetch`]: a decorator adding exponential backoff with jitter
//!   around any [`FetchPage`]. Retries default to zero; they are an opt-in
//!   knob, not baseline behavior.
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use rand::{rng, Rng};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::error::CrawlError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
     image/avif,image/webp,image/apng,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const BROWSER_REFERER: &str = "https://finance.yahoo.com";

/// Trait for fetching a page body by URL.
///
/// Implementors return the response body as text or a
/// [`CrawlError::Fetch`]. Scrapers take `&impl FetchPage` so tests can
/// substitute a stub.
pub trait FetchPage {
    /// Fetch `url` and return the body text.
    async fn fetch_page(&self, url: &str) -> Result<String, CrawlError>;
}

/// HTTP fetcher backed by a shared `reqwest::Client`.
///
/// The client carries the browser-like request headers the source expects
/// and a per-request timeout. It is constructed once and passed by
/// reference; there is no global session state.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );
        headers.insert(REFERER, HeaderValue::from_static(BROWSER_REFERER));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_page(&self, url: &str) -> Result<String, CrawlError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CrawlError::fetch(url, e))?
            .error_for_status()
            .map_err(|e| CrawlError::fetch(url, e))?;
        let body = response
            .text()
            .await
            .map_err(|e| CrawlError::fetch(url, e))?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchPage`].
///
/// With `max_retries = 0` the inner fetcher is tried exactly once, which is
/// the default contract. Each retry doubles the delay up to `max_delay`,
/// plus 0-250 ms of jitter.
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: FetchPage,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchPage for RetryFetch<T>
where
    T: FetchPage,
{
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_page(&self, url: &str) -> Result<String, CrawlError> {
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch_page(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first `failures` calls, then succeeds.
    struct FlakyFetcher {
        failures: usize,
        calls: AtomicUsize,
    }

    impl FetchPage for FlakyFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String, CrawlError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(CrawlError::fetch(url, "connection reset"))
            } else {
                Ok("<html></html>".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_zero_retries_fails_on_first_error() {
        let flaky = FlakyFetcher {
            failures: 1,
            calls: AtomicUsize::new(0),
        };
        let fetcher = RetryFetch::new(flaky, 0, Duration::from_millis(1));
        let err = fetcher.fetch_page("https://example.com").await.unwrap_err();
        assert!(matches!(err, CrawlError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transient_failure() {
        let flaky = FlakyFetcher {
            failures: 2,
            calls: AtomicUsize::new(0),
        };
        let fetcher = RetryFetch::new(flaky, 3, Duration::from_millis(1));
        let body = fetcher.fetch_page("https://example.com").await.unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_last_error() {
        let flaky = FlakyFetcher {
            failures: 10,
            calls: AtomicUsize::new(0),
        };
        let fetcher = RetryFetch::new(flaky, 2, Duration::from_millis(1));
        let err = fetcher.fetch_page("https://example.com").await.unwrap_err();
        assert!(matches!(err, CrawlError::Fetch { .. }));
        assert_eq!(flaky_calls(&fetcher), 3);
    }

    fn flaky_calls(fetcher: &RetryFetch<FlakyFetcher>) -> usize {
        fetcher.inner.calls.load(Ordering::SeqCst)
    }
}
