//! Persistent URL cache for idempotent downloads.
//!
//! Maps each landing-page URL to the file URL already downloaded for it, so a
//! rerun skips every identifier it has handled before. Backed by a single
//! pretty-printed JSON file: loaded once at construction, rewritten in full on
//! every store (write-through). Writes go to a temp file in the same directory
//! followed by a rename, so a crash mid-write never corrupts the backing file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Errors from cache persistence. A failed store is reported by callers and
/// does not abort a run; the in-memory entry is kept either way.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Writing or renaming the backing file failed.
    #[error("IO error writing cache to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the mapping failed.
    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Landing URL → resolved file URL store with a JSON file behind it.
///
/// Keys are only ever inserted or updated, never deleted; pruning is an
/// external concern.
#[derive(Debug)]
pub struct UrlCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl UrlCache {
    /// Loads the cache from `path`.
    ///
    /// A missing or zero-length file yields an empty mapping and creates an
    /// empty backing file. A file that exists but cannot be parsed is left on
    /// disk untouched; the cache starts empty and the problem is logged.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(body) if !body.trim().is_empty() => match serde_json::from_str(&body) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cache file unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Ok(_) => BTreeMap::new(),
            Err(_) => {
                // First run: create the empty backing file so later write
                // failures surface as store errors, not silent absence.
                if let Err(e) = std::fs::write(&path, "") {
                    warn!(path = %path.display(), error = %e, "could not create cache file");
                }
                BTreeMap::new()
            }
        };

        debug!(path = %path.display(), entries = entries.len(), "cache loaded");
        Self { path, entries }
    }

    /// Pure in-memory lookup; never touches disk.
    #[must_use]
    pub fn lookup(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records `url → resolved` and rewrites the whole backing file.
    ///
    /// The in-memory entry is updated before the write, so a persistence
    /// failure leaves memory ahead of disk until the next successful store.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if serialization or the file write fails.
    pub fn store(
        &mut self,
        url: impl Into<String>,
        resolved: impl Into<String>,
    ) -> Result<(), CacheError> {
        self.entries.insert(url.into(), resolved.into());
        self.persist()
    }

    /// Rewrites the backing file atomically: temp file in the same directory,
    /// then rename over the target.
    fn persist(&self) -> Result<(), CacheError> {
        let body = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");

        std::fs::write(&tmp, body).map_err(|source| CacheError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), entries = self.entries.len(), "cache persisted");
        Ok(())
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
