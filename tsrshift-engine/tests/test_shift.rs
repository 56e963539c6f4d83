use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rstest::*;

use tsrshift_core::models::{Region, RegionCounts, SampleGroup, SampleGroups, Strand};
use tsrshift_engine::{
    Analysis, Direction, ResultRegistry, ShiftConfig, ShiftError, run_shift,
};

fn region_counts(chr: &str, start: u32, strand: Strand, id: &str, dense: &[u64]) -> RegionCounts {
    let region = Region::new(chr, start, start + dense.len() as u32, strand, id).unwrap();
    RegionCounts::from_dense(region, dense).unwrap()
}

fn groups(ctrl: Vec<RegionCounts>, treated: Vec<RegionCounts>) -> SampleGroups {
    SampleGroups::new()
        .with_group(SampleGroup::new("ctrl", ctrl))
        .with_group(SampleGroup::new("treated", treated))
}

#[fixture]
fn data_path() -> PathBuf {
    std::env::current_dir()
        .unwrap()
        .join("../tests/data/shift")
}

#[fixture]
fn fixture_groups(data_path: PathBuf) -> SampleGroups {
    [
        SampleGroup::try_from(data_path.join("ctrl.tsv")).unwrap(),
        SampleGroup::try_from(data_path.join("treated.tsv")).unwrap(),
    ]
    .into_iter()
    .collect()
}

#[fixture]
fn config() -> ShiftConfig {
    ShiftConfig::new("ctrl_vs_treated", "ctrl", "treated").with_seed(42)
}

#[rstest]
fn test_maximal_downstream_shift(config: ShiftConfig) {
    let groups = groups(
        vec![region_counts("chr1", 100, Strand::Forward, "a", &[10, 0, 0, 0, 0])],
        vec![region_counts("chr1", 100, Strand::Forward, "b", &[0, 0, 0, 0, 10])],
    );

    let comparison = run_shift(&groups, &config).unwrap();
    assert_eq!(comparison.len(), 1);

    let row = &comparison.results()[0];
    assert_eq!(row.consensus_id, "chr1:100-105:+");
    assert_eq!(row.ems, Some(1.0));
    assert!(row.p_value.unwrap() < 0.01);
    assert!(row.significant);
    assert_eq!(row.direction, Direction::Downstream);
}

#[rstest]
fn test_reverse_strand_is_oriented(config: ShiftConfig) {
    // on the minus strand the highest coordinate is the 5' end
    let groups = groups(
        vec![region_counts("chr1", 100, Strand::Reverse, "a", &[0, 0, 0, 0, 10])],
        vec![region_counts("chr1", 100, Strand::Reverse, "b", &[10, 0, 0, 0, 0])],
    );

    let comparison = run_shift(&groups, &config).unwrap();
    let row = &comparison.results()[0];
    assert_eq!(row.ems, Some(1.0));
    assert_eq!(row.direction, Direction::Downstream);
}

#[rstest]
fn test_no_shift(config: ShiftConfig) {
    let groups = groups(
        vec![region_counts("chr1", 100, Strand::Forward, "a", &[5, 5, 5, 5, 5])],
        vec![region_counts("chr1", 100, Strand::Forward, "b", &[5, 5, 5, 5, 5])],
    );

    let comparison = run_shift(&groups, &config).unwrap();
    let row = &comparison.results()[0];
    assert_eq!(row.ems, Some(0.0));
    assert_eq!(row.p_value, Some(1.0));
    assert_eq!(row.q_value, Some(1.0));
    assert!(!row.significant);
    assert_eq!(row.direction, Direction::None);
}

#[rstest]
fn test_no_matching_regions(config: ShiftConfig) {
    let groups = groups(
        vec![region_counts("chr1", 100, Strand::Forward, "a", &[20, 20])],
        vec![region_counts("chr2", 100, Strand::Forward, "b", &[20, 20])],
    );

    let comparison = run_shift(&groups, &config).unwrap();
    assert!(comparison.is_empty());
    assert_eq!(comparison.name(), "ctrl_vs_treated");
    assert_eq!(comparison.summary().n_regions, 0);
}

#[rstest]
fn test_sub_threshold_regions_are_dropped(config: ShiftConfig) {
    let groups = groups(
        vec![region_counts("chr1", 100, Strand::Forward, "a", &[3, 3])],
        vec![region_counts("chr1", 100, Strand::Forward, "b", &[30, 30])],
    );

    let comparison = run_shift(&groups, &config).unwrap();
    assert!(comparison.is_empty());
}

#[rstest]
fn test_fixture_files(fixture_groups: SampleGroups, config: ShiftConfig) {
    let comparison = run_shift(&fixture_groups, &config).unwrap();

    let ids: Vec<&str> = comparison
        .results()
        .iter()
        .map(|r| r.consensus_id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["chr1:1000-1012:+", "chr1:5000-5005:+", "chr2:300-322:-"]
    );

    let shifted = comparison.get("chr1:1000-1012:+").unwrap();
    assert_eq!(shifted.region_id_1, "ctrl_tsr_1");
    assert_eq!(shifted.region_id_2, "trt_tsr_1");
    assert_eq!(shifted.distance, 2.0);
    assert_eq!(shifted.total_1, 60);
    assert_eq!(shifted.total_2, 60);
    assert_eq!(shifted.direction, Direction::Downstream);
    assert!(shifted.significant);

    let unchanged = comparison.get("chr1:5000-5005:+").unwrap();
    assert_eq!(unchanged.ems, Some(0.0));
    assert!(!unchanged.significant);

    let reverse = comparison.get("chr2:300-322:-").unwrap();
    assert!(reverse.ems.unwrap() > 0.0);
    assert_eq!(reverse.direction, Direction::Downstream);
    assert_eq!(reverse.distance, 3.5);

    let summary = comparison.summary();
    assert_eq!(summary.n_evaluated, 3);
    assert_eq!(summary.n_significant, 2);
    assert_eq!(summary.n_downstream, 2);
    assert_eq!(comparison.seed(), 42);
}

#[rstest]
fn test_same_seed_any_thread_count(fixture_groups: SampleGroups, config: ShiftConfig) {
    let single = run_shift(&fixture_groups, &config.clone().with_threads(1)).unwrap();
    let many = run_shift(&fixture_groups, &config.clone().with_threads(4)).unwrap();
    let global = run_shift(&fixture_groups, &config).unwrap();

    assert_eq!(single.results(), many.results());
    assert_eq!(single.results(), global.results());
}

#[rstest]
fn test_rerun_replaces_in_registry(fixture_groups: SampleGroups, config: ShiftConfig) {
    let mut registry = ResultRegistry::new();
    registry.register(run_shift(&fixture_groups, &config).unwrap());

    let rerun = run_shift(&fixture_groups, &config.clone().with_seed(7)).unwrap();
    let previous = registry.register(rerun).unwrap();

    assert_eq!(previous.seed(), 42);
    assert_eq!(
        registry.get(Analysis::TssShift, "ctrl_vs_treated").unwrap().seed(),
        7
    );
}

#[rstest]
fn test_unknown_group_computes_nothing(fixture_groups: SampleGroups) {
    let config = ShiftConfig::new("cmp", "ctrl", "knockdown");
    let result = run_shift(&fixture_groups, &config);
    assert!(matches!(result, Err(ShiftError::UnknownSampleGroup(_))));
}
