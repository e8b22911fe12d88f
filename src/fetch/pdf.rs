//! PDF retrieval and saving.
//!
//! Takes a resolved landing page, normalizes the raw file URL found in the
//! markup (mirrors emit scheme-relative and backslash-escaped forms), fetches
//! the document with the shared retrying fetcher, and writes it under the
//! target directory with a sanitized filename.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use url::Url;

use super::client::PageFetcher;
use super::error::FetchError;
use super::filename::sanitize_title;

/// Minimum title length (in characters) for the title to name the saved file;
/// anything shorter falls back to the article identifier.
const MIN_TITLE_CHARS: usize = 5;

/// Normalizes a raw file URL scraped from landing-page markup.
///
/// Backslashes are JavaScript string-escaping artifacts and are dropped.
/// Scheme-relative or bare-host URLs get an `https:` scheme so they are
/// fetchable.
#[must_use]
pub fn normalize_file_url(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|&c| c != '\\').collect();
    if Url::parse(&cleaned).is_ok() {
        cleaned
    } else {
        format!("https:{cleaned}")
    }
}

/// Downloads PDFs resolved from landing pages and writes them to disk.
#[derive(Debug, Clone)]
pub struct PdfDownloader {
    fetcher: PageFetcher,
}

impl PdfDownloader {
    /// Creates a downloader sharing the given fetcher (client and retry
    /// budget included).
    #[must_use]
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetches the PDF at `file_url` (already normalized) and saves it under
    /// `target_dir`.
    ///
    /// The filename stem is the landing-page title when it is long enough to
    /// be meaningful, otherwise `fallback_name` (typically the DOI). Returns
    /// the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the download fails or the file cannot be
    /// written.
    #[instrument(skip(self, title))]
    pub async fn fetch_pdf(
        &self,
        file_url: &str,
        title: &str,
        fallback_name: &str,
        target_dir: &Path,
    ) -> Result<PathBuf, FetchError> {
        let body = self.fetcher.get_bytes(file_url).await?;

        let stem = if title.chars().count() >= MIN_TITLE_CHARS {
            title
        } else {
            debug!(title, fallback_name, "title too short, naming file after identifier");
            fallback_name
        };
        let path = target_dir.join(format!("{}.pdf", sanitize_title(stem)));

        std::fs::write(&path, &body).map_err(|e| FetchError::io(&path, e))?;
        info!(path = %path.display(), bytes = body.len(), "saved PDF");
        Ok(path)
    }
}
