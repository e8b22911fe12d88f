//! Journal quality buckets used to pick a destination subdirectory.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The four JCR quartile buckets. Assigned externally per identifier; this
/// crate uses them only to choose the output subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

/// All quartiles in order, used to pre-create the output subdirectories.
pub const ALL_QUARTILES: [Quartile; 4] =
    [Quartile::Q1, Quartile::Q2, Quartile::Q3, Quartile::Q4];

impl Quartile {
    /// Directory name for this bucket.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Quartile::Q1 => "Q1",
            Quartile::Q2 => "Q2",
            Quartile::Q3 => "Q3",
            Quartile::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized quartile labels.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized quartile label: {0:?} (expected Q1..Q4)")]
pub struct QuartileParseError(pub String);

impl FromStr for Quartile {
    type Err = QuartileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Q1" | "q1" => Ok(Quartile::Q1),
            "Q2" | "q2" => Ok(Quartile::Q2),
            "Q3" | "q3" => Ok(Quartile::Q3),
            "Q4" | "q4" => Ok(Quartile::Q4),
            other => Err(QuartileParseError(other.to_string())),
        }
    }
}
