//! Fetch pipeline configuration and gateway URL construction.

use std::time::Duration;

use crate::user_agent::default_user_agent;

/// Known gateway mirrors; the first is the default.
pub const KNOWN_MIRRORS: &[&str] = &["sci-hub.wf", "sci-hub.se"];

/// Default retry budget for transient (5xx) failures.
pub const DEFAULT_RETRIES: u32 = 2;

/// Default minimum interval between requests to the same host, in seconds.
pub const DEFAULT_HOST_INTERVAL_SECS: u64 = 3;

/// Configuration surface for the fetch pipeline.
///
/// Everything here has a sensible default; callers typically override only the
/// gateway host or politeness settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Gateway host the landing pages are fetched from.
    pub gateway_host: String,
    /// Use `https` for gateway URLs (`http` otherwise).
    pub use_https: bool,
    /// Agent identity sent with every request and checked against robots rules.
    pub user_agent: String,
    /// Optional proxy URL applied to all requests.
    pub proxy: Option<String>,
    /// Retry budget for 5xx responses (per request, not per identifier).
    pub retries: u32,
    /// Minimum elapsed time between two requests to the same host.
    pub host_interval: Duration,
    /// Proceed even when the robots policy is missing or disallows a path.
    pub ignore_robots: bool,
    /// Explicit robots.txt URL; defaults to the gateway's well-known path.
    pub robots_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            gateway_host: KNOWN_MIRRORS[0].to_string(),
            use_https: true,
            user_agent: default_user_agent(),
            proxy: None,
            retries: DEFAULT_RETRIES,
            host_interval: Duration::from_secs(DEFAULT_HOST_INTERVAL_SECS),
            ignore_robots: false,
            robots_url: None,
        }
    }
}

impl FetchConfig {
    fn scheme(&self) -> &'static str {
        if self.use_https { "https" } else { "http" }
    }

    /// Landing-page URL for one identifier: `{scheme}://{host}/{doi}`.
    #[must_use]
    pub fn landing_url(&self, doi: &str) -> String {
        format!("{}://{}/{}", self.scheme(), self.gateway_host, doi)
    }

    /// Robots-policy URL: the configured override, or the gateway's
    /// `/robots.txt`.
    #[must_use]
    pub fn robots_url(&self) -> String {
        self.robots_url.clone().unwrap_or_else(|| {
            format!("{}://{}/robots.txt", self.scheme(), self.gateway_host)
        })
    }
}
