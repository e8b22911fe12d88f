//! Per-host rate limiting for gateway requests.
//!
//! Enforces a minimum elapsed time between two requests to the same network
//! host. This is a courtesy mechanism, not a hard cap: the orchestrator is the
//! single caller, but the state is kept safe for shared use so the limiter
//! does not need to change if callers ever do.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Per-host rate limiter.
///
/// The first request to any host proceeds immediately; subsequent requests to
/// the same host wait until `interval` has elapsed since the last one.
/// Different hosts never delay each other.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum delay between requests to the same host.
    interval: Duration,

    /// Last-request time per host. Arc lets the DashMap shard lock be
    /// released before awaiting on the inner Mutex.
    hosts: DashMap<String, Arc<Mutex<Option<Instant>>>>,
}

impl RateLimiter {
    /// Creates a rate limiter with the given minimum inter-request interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            hosts: DashMap::new(),
        }
    }

    /// Returns the configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks until a request to `url`'s host is polite, then records now as
    /// that host's last-request time.
    #[instrument(skip(self), fields(host))]
    pub async fn acquire(&self, url: &str) {
        let host = extract_host(url);
        tracing::Span::current().record("host", host.as_str());

        let state = self
            .hosts
            .entry(host.clone())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();

        // DashMap lock released above; only the host Mutex is held across await
        let mut last_request = state.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                let delay = self.interval.saturating_sub(elapsed);
                debug!(host = %host, delay_ms = delay.as_millis(), "waiting before request");
                tokio::time::sleep(delay).await;
            }
        } else {
            debug!(host = %host, "first request to host, no wait");
        }

        *last_request = Some(Instant::now());
    }
}

/// Extracts the host from a URL, lowercased.
///
/// Returns "unknown" for malformed URLs so even those are spaced out rather
/// than exempted.
#[must_use]
pub fn extract_host(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| "unknown".to_string())
}
