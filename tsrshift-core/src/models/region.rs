use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

///
/// Strand of a genomic region. `Unstranded` covers both `*` and `.`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strand {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Forward,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Reverse,
    #[cfg_attr(feature = "serde", serde(rename = "*"))]
    Unstranded,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unstranded => "*",
        }
    }

    /// Whether transcription runs toward lower coordinates.
    pub fn is_reverse(&self) -> bool {
        matches!(self, Strand::Reverse)
    }
}

impl FromStr for Strand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "*" | "." => Ok(Strand::Unstranded),
            other => Err(CoreError::InvalidStrand(other.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

///
/// Region struct, a stranded half-open interval `[start, end)` with an identifier.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
    pub id: String,
}

impl Region {
    ///
    /// Create a new region, rejecting empty or inverted intervals.
    ///
    pub fn new(
        chr: impl Into<String>,
        start: u32,
        end: u32,
        strand: Strand,
        id: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let chr = chr.into();
        if start >= end {
            return Err(CoreError::InvalidRegion { chr, start, end });
        }
        Ok(Region {
            chr,
            start,
            end,
            strand,
            id: id.into(),
        })
    }

    ///
    /// Get length of the region
    ///
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    /// Twice the interval midpoint, `start + end`. Kept doubled so that
    /// midpoint distances stay exact for odd widths.
    pub fn mid_point_x2(&self) -> u64 {
        self.start as u64 + self.end as u64
    }

    /// Whether an absolute coordinate falls inside `[start, end)`.
    pub fn contains(&self, position: u32) -> bool {
        position >= self.start && position < self.end
    }

    ///
    /// Get file string of Region
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.chr, self.start, self.end, self.id, self.strand
        )
    }

    /// Short `chr:start-end:strand` label.
    pub fn locus(&self) -> String {
        format!("{}:{}-{}:{}", self.chr, self.start, self.end, self.strand)
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
