//! Signed earth mover's score between two positional distributions.
//!
//! Over an oriented support of length `L`:
//!
//! ```text
//! ems = Σ_{i=0}^{L-2} (CDF_A(i) − CDF_B(i)) / (L − 1)
//! ```
//!
//! The sum is the signed 1-D earth mover (Wasserstein-1) distance in
//! positions, `L − 1` the largest displacement possible, so the score lies in
//! `[-1, 1]`. Positive scores mean B has moved toward the 3' end relative to
//! A (downstream), negative scores toward the 5' end (upstream).

use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;
use crate::errors::{EngineResult, ShiftError};

/// Direction of a TSS shift of sample 2 relative to sample 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upstream,
    Downstream,
    None,
}

impl Direction {
    /// Only an exact zero has no direction.
    pub fn from_score(ems: f64) -> Self {
        if ems > 0.0 {
            Direction::Downstream
        } else if ems < 0.0 {
            Direction::Upstream
        } else {
            Direction::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Upstream => "upstream",
            Direction::Downstream => "downstream",
            Direction::None => "none",
        }
    }
}

///
/// Score two distributions over the same consensus span.
///
/// Fails with [`ShiftError::InvalidDistribution`] if either side had a total
/// count of zero and with [`ShiftError::SpanMismatch`] if the supports differ.
///
pub fn earth_movers_score(a: &Distribution, b: &Distribution) -> EngineResult<f64> {
    if a.len() != b.len() {
        return Err(ShiftError::SpanMismatch(a.len(), b.len()));
    }
    match (a.cdf(), b.cdf()) {
        (Some(cdf_a), Some(cdf_b)) => Ok(score_cdfs(cdf_a, cdf_b)),
        _ => Err(ShiftError::InvalidDistribution),
    }
}

pub(crate) fn score_cdfs(cdf_a: &[f64], cdf_b: &[f64]) -> f64 {
    let len = cdf_a.len().min(cdf_b.len());
    if len < 2 {
        return 0.0;
    }

    let displacement: f64 = cdf_a[..len - 1]
        .iter()
        .zip(&cdf_b[..len - 1])
        .map(|(a, b)| a - b)
        .sum();

    (displacement / (len - 1) as f64).clamp(-1.0, 1.0)
}
