use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{EngineResult, ShiftError};

pub const DEFAULT_MAX_DISTANCE: u32 = 100;
pub const DEFAULT_MIN_THRESHOLD: u64 = 10;
pub const DEFAULT_N_RESAMPLES: usize = 1000;
pub const DEFAULT_FDR_THRESHOLD: f64 = 0.05;

fn default_max_distance() -> u32 {
    DEFAULT_MAX_DISTANCE
}

fn default_min_threshold() -> u64 {
    DEFAULT_MIN_THRESHOLD
}

fn default_n_resamples() -> usize {
    DEFAULT_N_RESAMPLES
}

fn default_fdr_threshold() -> f64 {
    DEFAULT_FDR_THRESHOLD
}

///
/// Parameters of one shift comparison between two sample groups.
///
/// Can be written as TOML:
///
/// ```toml
/// comparison_name = "ctrl_vs_treated"
/// sample_1 = "ctrl"
/// sample_2 = "treated"
/// max_distance = 100
/// min_threshold = 10
/// n_resamples = 1000
/// fdr_threshold = 0.05
/// seed = 42
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ShiftConfig {
    pub comparison_name: String,
    /// Reference condition (A in the score).
    pub sample_1: String,
    /// Compared condition (B in the score).
    pub sample_2: String,
    /// Largest midpoint distance, in bp, at which two regions are paired.
    #[serde(default = "default_max_distance")]
    pub max_distance: u32,
    /// Minimum total count a region needs in its own sample group.
    #[serde(default = "default_min_threshold")]
    pub min_threshold: u64,
    #[serde(default = "default_n_resamples")]
    pub n_resamples: usize,
    #[serde(default = "default_fdr_threshold")]
    pub fdr_threshold: f64,
    /// Base seed of the permutation test. Drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Worker threads for region scoring. Uses the global rayon pool when absent.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl ShiftConfig {
    pub fn new(
        comparison_name: impl Into<String>,
        sample_1: impl Into<String>,
        sample_2: impl Into<String>,
    ) -> Self {
        ShiftConfig {
            comparison_name: comparison_name.into(),
            sample_1: sample_1.into(),
            sample_2: sample_2.into(),
            max_distance: DEFAULT_MAX_DISTANCE,
            min_threshold: DEFAULT_MIN_THRESHOLD,
            n_resamples: DEFAULT_N_RESAMPLES,
            fdr_threshold: DEFAULT_FDR_THRESHOLD,
            seed: None,
            threads: None,
        }
    }

    pub fn with_max_distance(mut self, max_distance: u32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_min_threshold(mut self, min_threshold: u64) -> Self {
        self.min_threshold = min_threshold;
        self
    }

    pub fn with_n_resamples(mut self, n_resamples: usize) -> Self {
        self.n_resamples = n_resamples;
        self
    }

    pub fn with_fdr_threshold(mut self, fdr_threshold: f64) -> Self {
        self.fdr_threshold = fdr_threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    ///
    /// Check every parameter before anything is computed.
    ///
    pub fn validate(&self) -> EngineResult<()> {
        if self.comparison_name.trim().is_empty() {
            return Err(ShiftError::EmptyComparisonName);
        }
        if self.max_distance == 0 {
            return Err(ShiftError::InvalidMaxDistance(self.max_distance as u64));
        }
        if self.min_threshold == 0 {
            return Err(ShiftError::InvalidMinThreshold(self.min_threshold));
        }
        if self.n_resamples == 0 {
            return Err(ShiftError::InvalidResamples(self.n_resamples as u64));
        }
        if !(self.fdr_threshold > 0.0 && self.fdr_threshold <= 1.0) {
            return Err(ShiftError::InvalidFdrThreshold(self.fdr_threshold));
        }
        Ok(())
    }
}

impl TryFrom<&Path> for ShiftConfig {
    type Error = ShiftError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
