//! Positional TSS distributions over a consensus span.

use tsrshift_core::models::RegionCounts;

use crate::matching::ConsensusRegion;

///
/// Probability mass function of TSS usage over the 5' to 3' oriented
/// positions of a consensus span.
///
/// A distribution built from a region with a total count of zero is
/// invalid: it has no pmf and can't be scored.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    counts: Vec<u64>,
    total: u64,
    pmf: Vec<f64>,
    cdf: Vec<f64>,
}

impl Distribution {
    ///
    /// Normalise oriented per-position counts.
    ///
    pub fn from_counts(counts: Vec<u64>) -> Self {
        let total: u64 = counts.iter().sum();
        let (pmf, cdf) = if total == 0 {
            (Vec::new(), Vec::new())
        } else {
            let mut cdf = vec![0.0; counts.len()];
            fill_cdf(&counts, total, &mut cdf);
            let pmf: Vec<f64> = counts.iter().map(|c| *c as f64 / total as f64).collect();
            (pmf, cdf)
        };

        Distribution {
            counts,
            total,
            pmf,
            cdf,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.total > 0
    }

    /// Number of positions in the support.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Raw oriented counts the distribution was built from.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn pmf(&self) -> Option<&[f64]> {
        self.is_valid().then_some(self.pmf.as_slice())
    }

    pub fn cdf(&self) -> Option<&[f64]> {
        self.is_valid().then_some(self.cdf.as_slice())
    }
}

///
/// Write the cumulative distribution of `counts` into `cdf`.
///
/// The running sum is kept in integers and divided once per position, so
/// two identical count vectors always give bit-identical CDFs.
///
pub(crate) fn fill_cdf(counts: &[u64], total: u64, cdf: &mut [f64]) {
    let total = total as f64;
    let mut running: u64 = 0;
    for (c, slot) in counts.iter().zip(cdf.iter_mut()) {
        running += c;
        *slot = running as f64 / total;
    }
}

///
/// Lay the counts of one region out over the oriented consensus span.
/// Positions the region doesn't cover are zero.
///
pub fn oriented_counts(consensus: &ConsensusRegion, counts: &RegionCounts) -> Vec<u64> {
    let mut dense = vec![0u64; consensus.width()];
    for (position, count) in counts.iter_positions() {
        if let Some(idx) = consensus.oriented_index(position) {
            dense[idx] += count;
        }
    }
    dense
}

///
/// Build the distribution of one region over a consensus span.
///
pub fn build(consensus: &ConsensusRegion, counts: &RegionCounts) -> Distribution {
    Distribution::from_counts(oriented_counts(consensus, counts))
}
