use thiserror::Error;

use tsrshift_core::errors::CoreError;

#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("max_distance must be positive, got {0}")]
    InvalidMaxDistance(u64),
    #[error("min_threshold must be positive, got {0}")]
    InvalidMinThreshold(u64),
    #[error("n_resamples must be at least 1, got {0}")]
    InvalidResamples(u64),
    #[error("fdr_threshold must be in (0, 1], got {0}")]
    InvalidFdrThreshold(f64),
    #[error("comparison_name must not be empty")]
    EmptyComparisonName,
    #[error("Unknown sample group: '{0}'")]
    UnknownSampleGroup(String),
    #[error("Distribution is invalid: source region has a total count of zero")]
    InvalidDistribution,
    #[error("Distributions span {0} and {1} positions, they must be equal")]
    SpanMismatch(usize, usize),
    #[error("Matched region {0} is missing from its sample group")]
    MissingRegion(String),
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type EngineResult<T> = std::result::Result<T, ShiftError>;
