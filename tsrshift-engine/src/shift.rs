//! TSS shift comparison between two sample groups.

use rayon::prelude::*;
use tracing::{debug, info};
use tsrshift_core::models::{RegionCounts, SampleGroup, SampleGroups};

use crate::config::ShiftConfig;
use crate::distribution;
use crate::ems::earth_movers_score;
use crate::errors::{EngineResult, ShiftError};
use crate::fdr::benjamini_hochberg;
use crate::matching::{ConsensusRegion, match_regions};
use crate::permutation::PermutationTester;
use crate::results::{Comparison, ComparisonParams, RegionScore, aggregate};

fn evaluate(
    region_index: usize,
    consensus: &ConsensusRegion,
    counts_1: &RegionCounts,
    counts_2: &RegionCounts,
    tester: &PermutationTester,
) -> EngineResult<(f64, f64)> {
    let dist_1 = distribution::build(consensus, counts_1);
    let dist_2 = distribution::build(consensus, counts_2);

    let ems = earth_movers_score(&dist_1, &dist_2)?;
    let p_value = tester.test(region_index, dist_1.counts(), dist_2.counts(), ems)?;
    Ok((ems, p_value))
}

///
/// Score and test one consensus region.
///
/// A region whose score can't be computed is returned without a score
/// rather than failing the batch.
///
pub fn score_region(
    region_index: usize,
    consensus: ConsensusRegion,
    counts_1: &RegionCounts,
    counts_2: &RegionCounts,
    tester: &PermutationTester,
) -> RegionScore {
    let score = match evaluate(region_index, &consensus, counts_1, counts_2, tester) {
        Ok(score) => Some(score),
        Err(e) => {
            debug!(region = %consensus.id, error = %e, "region is not evaluable");
            None
        }
    };

    RegionScore {
        total_1: counts_1.total(),
        total_2: counts_2.total(),
        consensus,
        score,
    }
}

///
/// Score every consensus region in parallel.
///
/// The output keeps the order of `consensus`, and region `i` is tested with
/// the generator of index `i`, so the result doesn't depend on how the work
/// is scheduled.
///
pub fn score_regions(
    consensus: Vec<ConsensusRegion>,
    group_1: &SampleGroup,
    group_2: &SampleGroup,
    tester: &PermutationTester,
) -> EngineResult<Vec<RegionScore>> {
    consensus
        .into_par_iter()
        .enumerate()
        .map(|(i, c)| {
            let counts_1 = group_1
                .get(c.index_1)
                .ok_or_else(|| ShiftError::MissingRegion(c.region_id_1.clone()))?;
            let counts_2 = group_2
                .get(c.index_2)
                .ok_or_else(|| ShiftError::MissingRegion(c.region_id_2.clone()))?;
            Ok(score_region(i, c, counts_1, counts_2, tester))
        })
        .collect()
}

fn lookup<'a>(groups: &'a SampleGroups, name: &str) -> EngineResult<&'a SampleGroup> {
    groups
        .get(name)
        .ok_or_else(|| ShiftError::UnknownSampleGroup(name.to_string()))
}

///
/// Run one shift comparison: match regions, score and test each pair,
/// correct the p-values and assemble the comparison.
///
/// The configuration is validated first; nothing is computed for an
/// invalid one. When the configuration holds no seed, one is drawn from
/// the OS and recorded on the returned comparison.
///
pub fn run_shift(groups: &SampleGroups, config: &ShiftConfig) -> EngineResult<Comparison> {
    config.validate()?;
    let group_1 = lookup(groups, &config.sample_1)?;
    let group_2 = lookup(groups, &config.sample_2)?;

    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    let tester = PermutationTester::new(config.n_resamples, seed)?;

    let consensus = match_regions(group_1, group_2, config.max_distance, config.min_threshold)?;
    info!(
        comparison = %config.comparison_name,
        sample_1 = group_1.name(),
        sample_2 = group_2.name(),
        regions_1 = group_1.len(),
        regions_2 = group_2.len(),
        consensus = consensus.len(),
        seed,
        "matched regions"
    );

    let scores = match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| ShiftError::ThreadPool(e.to_string()))?;
            pool.install(|| score_regions(consensus, group_1, group_2, &tester))?
        }
        None => score_regions(consensus, group_1, group_2, &tester)?,
    };

    let p_values: Vec<f64> = scores
        .iter()
        .filter_map(|s| s.score.map(|(_, p)| p))
        .collect();
    let q_values = benjamini_hochberg(&p_values);

    let comparison = aggregate(
        config.comparison_name.clone(),
        ComparisonParams::from_config(config, seed),
        scores,
        &q_values,
    );

    info!(
        comparison = comparison.name(),
        summary = %comparison.summary(),
        "shift comparison finished"
    );

    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tsrshift_core::models::{Region, Strand};

    use crate::ems::Direction;
    use crate::results::RegionStatus;

    fn counts(id: &str, start: u32, dense: &[u64]) -> RegionCounts {
        let end = start + dense.len() as u32;
        let region = Region::new("chr1", start, end, Strand::Forward, id).unwrap();
        RegionCounts::from_dense(region, dense).unwrap()
    }

    fn consensus_over(start: u32, end: u32) -> ConsensusRegion {
        ConsensusRegion {
            id: format!("chr1:{}-{}:+", start, end),
            chr: "chr1".to_string(),
            start,
            end,
            strand: Strand::Forward,
            index_1: 0,
            index_2: 0,
            region_id_1: "a".to_string(),
            region_id_2: "b".to_string(),
            distance: 0.0,
        }
    }

    #[fixture]
    fn tester() -> PermutationTester {
        PermutationTester::new(200, 42).unwrap()
    }

    #[rstest]
    fn test_zero_count_region_is_not_evaluable(tester: PermutationTester) {
        let a = counts("a", 100, &[5, 5, 5, 5, 5]);
        let b = counts("b", 100, &[0, 0, 0, 0, 0]);

        let score = score_region(0, consensus_over(100, 105), &a, &b, &tester);
        assert!(!score.is_evaluated());
        assert_eq!(score.total_1, 25);
        assert_eq!(score.total_2, 0);
    }

    #[rstest]
    fn test_evaluated_region_has_score(tester: PermutationTester) {
        let a = counts("a", 100, &[10, 0, 0, 0, 0]);
        let b = counts("b", 100, &[0, 0, 0, 0, 10]);

        let score = score_region(0, consensus_over(100, 105), &a, &b, &tester);
        let (ems, p) = score.score.unwrap();
        assert_eq!(ems, 1.0);
        assert!(p < 0.05);
    }

    #[rstest]
    fn test_non_evaluable_row_is_excluded_from_correction(tester: PermutationTester) {
        let group_1 = SampleGroup::new(
            "a",
            vec![counts("a1", 100, &[10, 0, 0, 0, 0]), counts("a2", 500, &[4, 4, 4])],
        );
        let group_2 = SampleGroup::new(
            "b",
            vec![counts("b1", 100, &[0, 0, 0, 0, 10]), counts("b2", 500, &[0, 0, 0])],
        );
        let mut second = consensus_over(500, 503);
        second.index_1 = 1;
        second.index_2 = 1;

        let scores = score_regions(
            vec![consensus_over(100, 105), second],
            &group_1,
            &group_2,
            &tester,
        )
        .unwrap();
        assert!(scores[0].is_evaluated());
        assert!(!scores[1].is_evaluated());

        let p: Vec<f64> = scores.iter().filter_map(|s| s.score.map(|(_, p)| p)).collect();
        let q = benjamini_hochberg(&p);
        let params = ComparisonParams::from_config(&ShiftConfig::new("cmp", "a", "b"), 42);
        let comparison = aggregate("cmp", params, scores, &q);

        let row = &comparison.results()[1];
        assert_eq!(row.status, RegionStatus::NonEvaluable);
        assert_eq!(row.direction, Direction::None);
        assert_eq!(row.q_value, None);
        assert_eq!(comparison.results()[0].q_value, Some(p[0]));
    }

    #[rstest]
    fn test_missing_region_index_is_an_error(tester: PermutationTester) {
        let group = SampleGroup::new("a", vec![counts("a1", 100, &[1, 2, 3])]);
        let mut consensus = consensus_over(100, 103);
        consensus.index_2 = 4;

        let result = score_regions(vec![consensus], &group, &group, &tester);
        assert!(matches!(result, Err(ShiftError::MissingRegion(_))));
    }

    #[rstest]
    fn test_unknown_sample_group() {
        let groups = SampleGroups::new().with_group(SampleGroup::new("ctrl", Vec::new()));
        let config = ShiftConfig::new("cmp", "ctrl", "treated");

        let result = run_shift(&groups, &config);
        assert!(matches!(result, Err(ShiftError::UnknownSampleGroup(name)) if name == "treated"));
    }

    #[rstest]
    fn test_invalid_config_fails_before_lookup() {
        let config = ShiftConfig::new("cmp", "x", "y").with_n_resamples(0);
        let result = run_shift(&SampleGroups::new(), &config);
        assert!(matches!(result, Err(ShiftError::InvalidResamples(0))));
    }

    #[rstest]
    fn test_seed_is_recorded_when_drawn() {
        let groups = SampleGroups::new()
            .with_group(SampleGroup::new("a", vec![counts("a1", 100, &[10, 5])]))
            .with_group(SampleGroup::new("b", vec![counts("b1", 100, &[5, 10])]));
        let config = ShiftConfig::new("cmp", "a", "b").with_n_resamples(20);

        let first = run_shift(&groups, &config).unwrap();
        let replay = run_shift(&groups, &config.clone().with_seed(first.seed())).unwrap();
        assert_eq!(first.results(), replay.results());
    }
}
