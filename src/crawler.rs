//! Sequential crawl orchestration.
//!
//! Drives one run over an ordered identifier list: cache check, robots check,
//! politeness wait, landing-page fetch, extraction, PDF download, cache
//! record. Per-identifier failures are tallied and logged, never propagated;
//! only environment problems (output directories cannot be created) abort a
//! run.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::cache::UrlCache;
use crate::config::FetchConfig;
use crate::extract::{ExtractOutcome, extract_landing};
use crate::fetch::client::{PageFetcher, build_http_client};
use crate::fetch::error::FetchError;
use crate::fetch::pdf::{PdfDownloader, normalize_file_url};
use crate::fetch::rate_limiter::RateLimiter;
use crate::fetch::robots::RobotsPolicy;
use crate::input::{PaperRef, RefList};
use crate::quartile::ALL_QUARTILES;

/// Errors that abort an entire run (as opposed to one identifier).
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The output directory tree could not be created.
    #[error("could not create output directory {path}: {source}")]
    OutputDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tallies for one run. Every identifier lands in exactly one of the three
/// outcome buckets, so `attempted == succeeded + blocked + failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Identifiers processed.
    pub attempted: usize,
    /// PDFs saved, plus cache hits.
    pub succeeded: usize,
    /// Skipped because the robots policy denied them (or could not be loaded).
    pub blocked: usize,
    /// Fetch, extraction, or save failures.
    pub failed: usize,
}

/// One configured crawl pipeline: shared HTTP client, retrying fetcher, PDF
/// downloader, and per-host rate limiter.
pub struct Crawler {
    config: FetchConfig,
    fetcher: PageFetcher,
    downloader: PdfDownloader,
    rate_limiter: RateLimiter,
}

impl Crawler {
    /// Builds the pipeline from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when the HTTP client cannot be
    /// constructed (for example an invalid proxy URL).
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = build_http_client(&config)?;
        let fetcher = PageFetcher::new(client, config.retries);
        Ok(Self {
            downloader: PdfDownloader::new(fetcher.clone()),
            rate_limiter: RateLimiter::new(config.host_interval),
            fetcher,
            config,
        })
    }

    /// Runs the crawl over `refs`, saving PDFs under `out_dir/Q1..Q4` and
    /// recording successes in `cache`.
    ///
    /// Identifiers are processed strictly in input order. The robots policy is
    /// fetched once up front; if it cannot be loaded, every identifier is
    /// blocked unless the ignore-robots override is set.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError`] only when the output directory tree cannot be
    /// created.
    #[instrument(skip(self, refs, cache), fields(refs = refs.len()))]
    pub async fn run(
        &self,
        refs: &RefList,
        out_dir: &Path,
        cache: &mut UrlCache,
    ) -> Result<CrawlStats, CrawlError> {
        create_output_tree(out_dir)?;

        let robots = if self.config.ignore_robots {
            debug!("robots checks disabled by configuration");
            None
        } else {
            RobotsPolicy::fetch(&self.fetcher, &self.config.robots_url()).await
        };

        let mut stats = CrawlStats::default();
        for paper in &refs.items {
            stats.attempted += 1;
            match self.process(paper, robots.as_ref(), out_dir, cache).await {
                Outcome::Succeeded => stats.succeeded += 1,
                Outcome::Blocked => stats.blocked += 1,
                Outcome::Failed => stats.failed += 1,
            }
        }

        info!(
            attempted = stats.attempted,
            succeeded = stats.succeeded,
            blocked = stats.blocked,
            failed = stats.failed,
            "run complete"
        );
        Ok(stats)
    }

    #[instrument(skip(self, robots, out_dir, cache), fields(doi = %paper.doi, quartile = %paper.quartile))]
    async fn process(
        &self,
        paper: &PaperRef,
        robots: Option<&RobotsPolicy>,
        out_dir: &Path,
        cache: &mut UrlCache,
    ) -> Outcome {
        let landing_url = self.config.landing_url(&paper.doi);

        if let Some(resolved) = cache.lookup(&landing_url) {
            info!(resolved, "already downloaded, skipping");
            return Outcome::Succeeded;
        }

        let allowed = self.config.ignore_robots
            || robots.is_some_and(|p| p.allows(&self.config.user_agent, &landing_url));
        if !allowed {
            warn!(url = %landing_url, "blocked by robots policy");
            return Outcome::Blocked;
        }

        self.rate_limiter.acquire(&landing_url).await;
        let html = match self.fetcher.get_text(&landing_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %landing_url, error = %e, "landing page fetch failed");
                return Outcome::Failed;
            }
        };

        let landing = match extract_landing(&html) {
            ExtractOutcome::Resolved(landing) => landing,
            ExtractOutcome::NotIndexed => {
                warn!(url = %landing_url, "article not available from gateway");
                return Outcome::Failed;
            }
        };

        let file_url = normalize_file_url(&landing.file_url);
        let target_dir = out_dir.join(paper.quartile.as_str());

        // The politeness wait was taken before the landing fetch; the file
        // download follows it directly.
        if let Err(e) = self
            .downloader
            .fetch_pdf(&file_url, &landing.title, &paper.doi, &target_dir)
            .await
        {
            warn!(url = %file_url, error = %e, "PDF download failed");
            return Outcome::Failed;
        }

        // A failed cache write costs a redundant download next run, nothing
        // more, so it only warns.
        if let Err(e) = cache.store(&landing_url, &file_url) {
            warn!(error = %e, "could not persist cache entry");
        }
        Outcome::Succeeded
    }
}

enum Outcome {
    Succeeded,
    Blocked,
    Failed,
}

/// Creates the output directory and one subdirectory per quartile.
fn create_output_tree(out_dir: &Path) -> Result<(), CrawlError> {
    for quartile in ALL_QUARTILES {
        let path = out_dir.join(quartile.as_str());
        std::fs::create_dir_all(&path).map_err(|source| CrawlError::OutputDir { path, source })?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_output_tree_makes_quartile_dirs() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("papers");
        create_output_tree(&out).unwrap();

        for name in ["Q1", "Q2", "Q3", "Q4"] {
            assert!(out.join(name).is_dir(), "missing {name}");
        }
    }

    #[test]
    fn test_create_output_tree_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("papers");
        create_output_tree(&out).unwrap();
        create_output_tree(&out).unwrap();
    }

    #[test]
    fn test_stats_default_is_zeroed() {
        let stats = CrawlStats::default();
        assert_eq!(stats.attempted, 0);
        assert_eq!(stats.succeeded + stats.blocked + stats.failed, 0);
    }
}
