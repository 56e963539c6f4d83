use std::io::Write;

use anyhow::{Context, Result};
use clap::ArgMatches;
use tracing::info;

use tsrshift_core::models::SampleGroup;
use tsrshift_engine::config::{DEFAULT_MAX_DISTANCE, DEFAULT_MIN_THRESHOLD};
use tsrshift_engine::{ConsensusRegion, match_regions};

use crate::utils::{open_output, parse_opt};

pub fn write_consensus<W: Write>(regions: &[ConsensusRegion], mut out: W) -> Result<()> {
    for r in regions {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.chr, r.start, r.end, r.strand, r.region_id_1, r.region_id_2, r.distance
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn run_match(matches: &ArgMatches) -> Result<()> {
    let sample_1 = matches
        .get_one::<String>("sample-1")
        .context("--sample-1 is required")?;
    let sample_2 = matches
        .get_one::<String>("sample-2")
        .context("--sample-2 is required")?;

    let max_distance = parse_opt::<u32>(matches, "max-distance")?.unwrap_or(DEFAULT_MAX_DISTANCE);
    let min_threshold =
        parse_opt::<u64>(matches, "min-threshold")?.unwrap_or(DEFAULT_MIN_THRESHOLD);

    let group_1 = SampleGroup::try_from(sample_1.as_str())
        .with_context(|| format!("Failed to load sample group: {}", sample_1))?;
    let group_2 = SampleGroup::try_from(sample_2.as_str())
        .with_context(|| format!("Failed to load sample group: {}", sample_2))?;

    let regions = match_regions(&group_1, &group_2, max_distance, min_threshold)?;
    info!(
        regions_1 = group_1.len(),
        regions_2 = group_2.len(),
        consensus = regions.len(),
        "matched regions"
    );

    write_consensus(&regions, open_output(matches.get_one::<String>("output"))?)
}
