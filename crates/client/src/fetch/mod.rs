//! Cached HTTP fetch pipeline.
//!
//! ### Cache first
//! - Every URL is looked up in the [`ResponseCache`] before touching the network.
//! - A hit is final, even when the cached body is empty.
//!
//! ### Outcome classification
//! - `200` served from the requested URL (or an extension of it): cached, `Success`.
//! - `200` served from somewhere else: redirect mismatch, `Empty`, not cached.
//! - `429`: `RateLimited`, surfaced to the caller which must stop the run.
//! - Anything else, including transport failures: `Empty`, not cached, retried next run.
//!
//! ### Pacing
//! - Network requests are spaced by a configurable minimum interval.

pub mod transport;
pub mod url;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

use bytes::Bytes;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
pub use url::{UrlError, is_same_target, page_url, resolve_href};

use gallery_core::cache::compute_cache_key;
use gallery_core::{AppConfig, Error, ResponseCache};

/// Status code the server uses to ask for backoff.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Configuration for the fetch pipeline.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: a desktop browser UA)
    pub user_agent: String,

    /// Request timeout (default: 30s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Minimum spacing between network requests (default: none)
    pub request_interval: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        Self::from(&app)
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            request_interval: config.request_interval(),
        }
    }
}

/// Result of fetching one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body bytes, from the cache or a fresh 200. May be empty.
    Success(Bytes),
    /// No content this run: empty URL, transport failure, non-200, or redirect mismatch.
    Empty,
    /// The server answered 429.
    RateLimited { status: u16 },
}

impl FetchOutcome {
    /// Collapse into the bytes to work with.
    ///
    /// `Empty` and an empty body both become `None`; a rate limit becomes
    /// [`Error::RateLimited`].
    pub fn into_content(self) -> Result<Option<Bytes>, Error> {
        match self {
            FetchOutcome::Success(bytes) if !bytes.is_empty() => Ok(Some(bytes)),
            FetchOutcome::Success(_) | FetchOutcome::Empty => Ok(None),
            FetchOutcome::RateLimited { status } => Err(Error::RateLimited { status }),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchOutcome::RateLimited { .. })
    }
}

/// Enforces a minimum interval between network requests.
#[derive(Debug)]
struct RequestPacer {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RequestPacer {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Wait until the next request is allowed.
    async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// Cache-fronted fetcher.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    pacer: RequestPacer,
}

impl Fetcher {
    /// Create a fetcher over an arbitrary transport.
    pub fn new(transport: Arc<dyn Transport>, cache: ResponseCache, config: &FetchConfig) -> Self {
        Self { transport, cache, pacer: RequestPacer::new(config.request_interval) }
    }

    /// Create a fetcher that talks HTTP through reqwest.
    pub fn with_reqwest(cache: ResponseCache, config: &FetchConfig) -> Result<Self, Error> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), cache, config))
    }

    /// Get reference to the cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch `url`, consulting and populating the cache.
    ///
    /// Ordinary network and HTTP failures are reported as [`FetchOutcome::Empty`]
    /// and leave the cache untouched so the next run retries them. Only cache
    /// I/O failures are returned as errors.
    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, Error> {
        if url.trim().is_empty() {
            return Ok(FetchOutcome::Empty);
        }

        let key = compute_cache_key(url);
        if let Some(bytes) = self.cache.get(url).await? {
            tracing::info!(url, filename = %key, "cache hit");
            return Ok(FetchOutcome::Success(Bytes::from(bytes)));
        }

        tracing::info!(url, filename = %key, "cache miss");
        self.pacer.acquire().await;

        let response = match self.transport.get(url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, exception = %e, "failed to download");
                return Ok(FetchOutcome::Empty);
            }
        };

        if response.status == TOO_MANY_REQUESTS {
            tracing::warn!(url, status_code = response.status, "rate limited");
            return Ok(FetchOutcome::RateLimited { status: response.status });
        }

        if response.status != 200 {
            tracing::warn!(url, status_code = response.status, "failed to download");
            return Ok(FetchOutcome::Empty);
        }

        if !is_same_target(url, &response.final_url) {
            tracing::warn!(orig_url = url, redirected_to = %response.final_url, "redirect mismatch");
            return Ok(FetchOutcome::Empty);
        }

        self.cache.put(url, &response.bytes).await?;
        Ok(FetchOutcome::Success(response.bytes))
    }
}
