//! Error types for the fetch module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from page fetches and PDF downloads.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection refused, TLS, ...). Not retried.
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion. Not retried.
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// HTTP error response after the retry budget was spent (5xx) or
    /// immediately (other >= 400 statuses).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// File system error while saving a download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed (bad proxy URL, TLS init).
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Whether a status code counts as a transient server error worth retrying.
#[must_use]
pub fn is_transient_status(status: u16) -> bool {
    (500..600).contains(&status)
}
