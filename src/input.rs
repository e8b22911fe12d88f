//! Parsing of the caller-supplied identifier list.
//!
//! The external metadata collaborator hands over an ordered list of
//! `(doi, quartile)` pairs as text lines. Order is preserved; malformed lines
//! are collected for reporting rather than failing the run.

use std::str::FromStr;

use crate::quartile::Quartile;

/// One article to fetch: an opaque DOI plus its externally assigned bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRef {
    pub doi: String,
    pub quartile: Quartile,
}

/// Result of parsing an identifier list: valid refs in input order, plus the
/// raw lines that could not be parsed.
#[derive(Debug, Default)]
pub struct RefList {
    pub items: Vec<PaperRef>,
    pub skipped: Vec<String>,
}

impl RefList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Parses `doi quartile` lines (whitespace- or comma-separated).
///
/// Blank lines and `#` comments are ignored. A line must carry exactly two
/// fields, a DOI and a valid quartile label; anything else lands in
/// `skipped`.
#[must_use]
pub fn parse_ref_list(text: &str) -> RefList {
    let mut result = RefList::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();

        match fields.as_slice() {
            [doi, bucket] => match Quartile::from_str(bucket) {
                Ok(quartile) => result.items.push(PaperRef {
                    doi: (*doi).to_string(),
                    quartile,
                }),
                Err(_) => result.skipped.push(line.to_string()),
            },
            _ => result.skipped.push(line.to_string()),
        }
    }

    result
}
