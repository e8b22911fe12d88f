//! HTTP-facing machinery: client construction, retrying fetches, robots
//! policy, per-host politeness, PDF saving, and filename hygiene.

pub mod client;
pub mod error;
pub mod filename;
pub mod pdf;
pub mod rate_limiter;
pub mod robots;

pub use client::{PageFetcher, build_http_client};
pub use error::{FetchError, is_transient_status};
pub use filename::sanitize_title;
pub use pdf::{PdfDownloader, normalize_file_url};
pub use rate_limiter::{RateLimiter, extract_host};
pub use robots::RobotsPolicy;
