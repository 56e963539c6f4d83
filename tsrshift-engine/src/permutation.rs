//! Label-permutation test of the earth mover's score.
//!
//! Under the null hypothesis every TSS count unit of a consensus region is
//! exchangeable between the two conditions. Each resample keeps the pooled
//! count of every position and the total of each condition, and deals the
//! pooled units out to the two labels at random without replacement, which
//! makes the per-position split multivariate hypergeometric.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use crate::distribution::fill_cdf;
use crate::ems::score_cdfs;
use crate::errors::{EngineResult, ShiftError};

/// Absolute tolerance under which a resampled score counts as a tie.
const TIE_TOLERANCE: f64 = 1e-12;

///
/// Permutation tester with an explicit base seed.
///
/// Every region draws from its own generator seeded with
/// `seed + region_index`, so p-values don't depend on thread count or
/// scheduling order.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermutationTester {
    n_resamples: usize,
    seed: u64,
}

impl PermutationTester {
    pub fn new(n_resamples: usize, seed: u64) -> EngineResult<Self> {
        if n_resamples < 1 {
            return Err(ShiftError::InvalidResamples(n_resamples as u64));
        }
        Ok(PermutationTester { n_resamples, seed })
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed of the generator used for one region.
    pub fn region_seed(&self, region_index: usize) -> u64 {
        self.seed.wrapping_add(region_index as u64)
    }

    ///
    /// Empirical p-value of `observed` for one region.
    ///
    /// # Arguments
    /// - region_index: position of the region in the batch, selects the generator
    /// - counts_a: oriented per-position counts of condition A
    /// - counts_b: oriented per-position counts of condition B
    /// - observed: score of the unpermuted counts
    ///
    /// Returns `(count_extreme + 1) / (n_resamples + 1)`.
    ///
    pub fn test(
        &self,
        region_index: usize,
        counts_a: &[u64],
        counts_b: &[u64],
        observed: f64,
    ) -> EngineResult<f64> {
        if counts_a.len() != counts_b.len() {
            return Err(ShiftError::SpanMismatch(counts_a.len(), counts_b.len()));
        }

        let total_a: u64 = counts_a.iter().sum();
        let total_b: u64 = counts_b.iter().sum();
        if total_a == 0 || total_b == 0 {
            return Err(ShiftError::InvalidDistribution);
        }

        let pooled: Vec<u64> = counts_a.iter().zip(counts_b).map(|(a, b)| a + b).collect();
        let unit_ends = unit_ends(&pooled);
        let threshold = observed.abs() - TIE_TOLERANCE;

        let mut rng = StdRng::seed_from_u64(self.region_seed(region_index));
        let len = pooled.len();
        let mut null_a = vec![0u64; len];
        let mut null_b = vec![0u64; len];
        let mut cdf_a = vec![0.0; len];
        let mut cdf_b = vec![0.0; len];

        let mut extreme: usize = 0;
        for _ in 0..self.n_resamples {
            deal(&pooled, &unit_ends, total_a, &mut rng, &mut null_a, &mut null_b);
            fill_cdf(&null_a, total_a, &mut cdf_a);
            fill_cdf(&null_b, total_b, &mut cdf_b);

            if score_cdfs(&cdf_a, &cdf_b).abs() >= threshold {
                extreme += 1;
            }
        }

        Ok((extreme + 1) as f64 / (self.n_resamples + 1) as f64)
    }
}

///
/// Exclusive end of every position's block of units when the pooled units
/// are numbered `0..pool_total` position by position.
///
fn unit_ends(pooled: &[u64]) -> Vec<u64> {
    pooled
        .iter()
        .scan(0u64, |running, c| {
            *running += c;
            Some(*running)
        })
        .collect()
}

///
/// Deal `draws` of the pooled units to label A, the rest to label B,
/// keeping per-position totals. Every subset of `draws` units is equally
/// likely.
///
fn deal(
    pooled: &[u64],
    unit_ends: &[u64],
    draws: u64,
    rng: &mut StdRng,
    out_a: &mut [u64],
    out_b: &mut [u64],
) {
    let pool_total = unit_ends.last().copied().unwrap_or(0);
    // sample the smaller label, the other one is the complement
    let to_a = draws * 2 <= pool_total;
    let amount = if to_a { draws } else { pool_total - draws };

    out_a.fill(0);
    for unit in index::sample(rng, pool_total as usize, amount as usize).iter() {
        let position = unit_ends.partition_point(|end| *end <= unit as u64);
        out_a[position] += 1;
    }

    for (i, &at_position) in pooled.iter().enumerate() {
        let chosen = out_a[i];
        let (a, b) = if to_a {
            (chosen, at_position - chosen)
        } else {
            (at_position - chosen, chosen)
        };
        out_a[i] = a;
        out_b[i] = b;
    }
}
