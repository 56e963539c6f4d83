//! Detection of shifts in transcription start site usage between two
//! conditions.
//!
//! Regions of two sample groups are paired by proximity, their per-position
//! TSS counts are turned into distributions over the shared span, and the
//! shift between the two distributions is scored with a signed earth
//! mover's score. Each score is tested against a label-permutation null and
//! the p-values of one comparison are corrected with Benjamini-Hochberg.
//!
//! # Example
//!
//! ```no_run
//! use tsrshift_core::models::{SampleGroup, SampleGroups};
//! use tsrshift_engine::{ResultRegistry, ShiftConfig, run_shift};
//!
//! let groups: SampleGroups = [
//!     SampleGroup::try_from("ctrl.tsv").unwrap(),
//!     SampleGroup::try_from("treated.tsv").unwrap(),
//! ]
//! .into_iter()
//! .collect();
//!
//! let config = ShiftConfig::new("ctrl_vs_treated", "ctrl", "treated").with_seed(42);
//! let comparison = run_shift(&groups, &config).unwrap();
//!
//! for result in comparison.significant() {
//!     println!("{}\t{:?}", result.consensus_id, result.ems);
//! }
//!
//! let mut registry = ResultRegistry::new();
//! registry.register(comparison);
//! ```

pub mod config;
pub mod distribution;
pub mod ems;
pub mod errors;
pub mod fdr;
pub mod matching;
pub mod permutation;
pub mod registry;
pub mod results;
pub mod shift;

// re-exports
pub use config::ShiftConfig;
pub use distribution::Distribution;
pub use ems::{Direction, earth_movers_score};
pub use errors::{EngineResult, ShiftError};
pub use fdr::benjamini_hochberg;
pub use matching::{ConsensusRegion, match_regions};
pub use permutation::PermutationTester;
pub use registry::{Analysis, ResultRegistry};
pub use results::{Comparison, ComparisonSummary, RegionStatus, ShiftResult};
pub use shift::run_shift;
