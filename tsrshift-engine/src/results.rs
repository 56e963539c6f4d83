//! Per-region shift results and the comparison that holds them.

use std::fmt;

use serde::{Deserialize, Serialize};
use tsrshift_core::models::Strand;

use crate::config::ShiftConfig;
use crate::ems::Direction;
use crate::matching::ConsensusRegion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionStatus {
    Evaluated,
    /// A distribution was invalid or the score couldn't be computed.
    NonEvaluable,
}

impl RegionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionStatus::Evaluated => "evaluated",
            RegionStatus::NonEvaluable => "non_evaluable",
        }
    }
}

///
/// Outcome of scoring and testing one consensus region, before FDR
/// correction.
///
#[derive(Debug, Clone, PartialEq)]
pub struct RegionScore {
    pub consensus: ConsensusRegion,
    pub total_1: u64,
    pub total_2: u64,
    /// `(ems, p_value)`, absent for non-evaluable regions.
    pub score: Option<(f64, f64)>,
}

impl RegionScore {
    pub fn is_evaluated(&self) -> bool {
        self.score.is_some()
    }
}

///
/// One row of a comparison.
///
/// `ems`, `p_value` and `q_value` are `None` when the region couldn't be
/// evaluated; such rows have direction `none` and are never significant.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftResult {
    pub consensus_id: String,
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
    pub region_id_1: String,
    pub region_id_2: String,
    pub distance: f64,
    pub total_1: u64,
    pub total_2: u64,
    pub ems: Option<f64>,
    pub p_value: Option<f64>,
    pub q_value: Option<f64>,
    pub significant: bool,
    pub direction: Direction,
    pub status: RegionStatus,
}

impl ShiftResult {
    pub fn is_evaluated(&self) -> bool {
        self.status == RegionStatus::Evaluated
    }
}

/// Effective parameters of a comparison, including the seed actually used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonParams {
    pub sample_1: String,
    pub sample_2: String,
    pub max_distance: u32,
    pub min_threshold: u64,
    pub n_resamples: usize,
    pub fdr_threshold: f64,
    pub seed: u64,
}

impl ComparisonParams {
    pub fn from_config(config: &ShiftConfig, seed: u64) -> Self {
        ComparisonParams {
            sample_1: config.sample_1.clone(),
            sample_2: config.sample_2.clone(),
            max_distance: config.max_distance,
            min_threshold: config.min_threshold,
            n_resamples: config.n_resamples,
            fdr_threshold: config.fdr_threshold,
            seed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub n_regions: usize,
    pub n_evaluated: usize,
    pub n_non_evaluable: usize,
    pub n_significant: usize,
    pub n_upstream: usize,
    pub n_downstream: usize,
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} regions ({} evaluated, {} non-evaluable), {} significant ({} upstream, {} downstream)",
            self.n_regions,
            self.n_evaluated,
            self.n_non_evaluable,
            self.n_significant,
            self.n_upstream,
            self.n_downstream
        )
    }
}

///
/// The named, immutable batch of shift results of one invocation.
///
/// Rows are ordered like the consensus regions they come from: by
/// chromosome, start, end and strand.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    name: String,
    params: ComparisonParams,
    results: Vec<ShiftResult>,
}

impl Comparison {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &ComparisonParams {
        &self.params
    }

    /// Seed the permutation test ran with.
    pub fn seed(&self) -> u64 {
        self.params.seed
    }

    pub fn results(&self) -> &[ShiftResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Look a row up by consensus id.
    pub fn get(&self, consensus_id: &str) -> Option<&ShiftResult> {
        self.results.iter().find(|r| r.consensus_id == consensus_id)
    }

    pub fn significant(&self) -> impl Iterator<Item = &ShiftResult> {
        self.results.iter().filter(|r| r.significant)
    }

    pub fn summary(&self) -> ComparisonSummary {
        let mut summary = ComparisonSummary {
            n_regions: self.results.len(),
            ..Default::default()
        };

        for result in &self.results {
            if result.is_evaluated() {
                summary.n_evaluated += 1;
            } else {
                summary.n_non_evaluable += 1;
            }
            if result.significant {
                summary.n_significant += 1;
                match result.direction {
                    Direction::Upstream => summary.n_upstream += 1,
                    Direction::Downstream => summary.n_downstream += 1,
                    Direction::None => {}
                }
            }
        }

        summary
    }
}

///
/// Assemble scored regions and their q-values into a comparison.
///
/// `q_values` holds one entry per evaluated region, in the order those
/// regions appear in `scores`. Nothing is recomputed here.
///
pub fn aggregate(
    name: impl Into<String>,
    params: ComparisonParams,
    scores: Vec<RegionScore>,
    q_values: &[f64],
) -> Comparison {
    let mut q_values = q_values.iter().copied();
    let fdr_threshold = params.fdr_threshold;

    let results = scores
        .into_iter()
        .map(|score| {
            let c = score.consensus;
            let (ems, p_value, q_value, significant, direction, status) = match score.score {
                Some((ems, p)) => {
                    let q = q_values.next();
                    let significant = q.is_some_and(|q| q <= fdr_threshold);
                    (
                        Some(ems),
                        Some(p),
                        q,
                        significant,
                        Direction::from_score(ems),
                        RegionStatus::Evaluated,
                    )
                }
                None => (
                    None,
                    None,
                    None,
                    false,
                    Direction::None,
                    RegionStatus::NonEvaluable,
                ),
            };

            ShiftResult {
                consensus_id: c.id,
                chr: c.chr,
                start: c.start,
                end: c.end,
                strand: c.strand,
                region_id_1: c.region_id_1,
                region_id_2: c.region_id_2,
                distance: c.distance,
                total_1: score.total_1,
                total_2: score.total_2,
                ems,
                p_value,
                q_value,
                significant,
                direction,
                status,
            }
        })
        .collect();

    Comparison {
        name: name.into(),
        params,
        results,
    }
}
