//! Scifetch Core Library
//!
//! This library retrieves scholarly-article PDFs for a list of DOIs from a
//! gateway site and persists them to a quartile-organized directory layout,
//! skipping anything already recorded in a persistent URL cache.
//!
//! # Architecture
//!
//! - [`cache`] - Persistent landing-URL → file-URL cache (JSON, write-through)
//! - [`fetch`] - HTTP fetching: retrying page/PDF GETs, rate limiting, robots
//! - [`extract`] - Landing-page parsing for the direct download URL and title
//! - [`crawler`] - Sequential orchestration of the whole pipeline
//!
//! The identifier list and its quality buckets are produced by an external
//! collaborator; this crate only consumes ordered `(doi, quartile)` pairs.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod input;
pub mod quartile;
pub mod user_agent;

// Re-export commonly used types
pub use cache::{CacheError, UrlCache};
pub use config::{DEFAULT_HOST_INTERVAL_SECS, DEFAULT_RETRIES, FetchConfig, KNOWN_MIRRORS};
pub use crawler::{CrawlError, CrawlStats, Crawler};
pub use extract::{ExtractOutcome, Landing, extract_landing};
pub use fetch::{FetchError, PageFetcher, PdfDownloader, RateLimiter, RobotsPolicy};
pub use input::{PaperRef, RefList, parse_ref_list};
pub use quartile::Quartile;
