use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use tracing::info;

use tsrshift_core::models::{SampleGroup, SampleGroups};
use tsrshift_engine::{Comparison, ShiftConfig, run_shift};

use crate::utils::{open_output, parse_opt};

const NA: &str = "NA";

const TSV_HEADER: [&str; 16] = [
    "consensus_id",
    "chr",
    "start",
    "end",
    "strand",
    "region_id_1",
    "region_id_2",
    "distance",
    "total_1",
    "total_2",
    "ems",
    "p_value",
    "q_value",
    "significant",
    "direction",
    "status",
];

fn load_group(path: &str, name: Option<&String>) -> Result<SampleGroup> {
    let group = SampleGroup::try_from(Path::new(path))
        .with_context(|| format!("Failed to load sample group: {}", path))?;
    Ok(match name {
        Some(name) => group.with_name(name.as_str()),
        None => group,
    })
}

///
/// Resolve the comparison parameters: the `--config` file if any, with
/// every flag given on the command line taking precedence.
///
fn resolve_config(matches: &ArgMatches, name_1: &str, name_2: &str) -> Result<ShiftConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ShiftConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to read config file: {}", path))?,
        None => ShiftConfig::new(format!("{}_vs_{}", name_1, name_2), name_1, name_2),
    };

    config.sample_1 = name_1.to_string();
    config.sample_2 = name_2.to_string();

    if let Some(name) = matches.get_one::<String>("comparison-name") {
        config.comparison_name = name.to_string();
    }
    if let Some(max_distance) = parse_opt::<u32>(matches, "max-distance")? {
        config.max_distance = max_distance;
    }
    if let Some(min_threshold) = parse_opt::<u64>(matches, "min-threshold")? {
        config.min_threshold = min_threshold;
    }
    if let Some(n_resamples) = parse_opt::<usize>(matches, "n-resamples")? {
        config.n_resamples = n_resamples;
    }
    if let Some(fdr) = parse_opt::<f64>(matches, "fdr")? {
        config.fdr_threshold = fdr;
    }
    if let Some(seed) = parse_opt::<u64>(matches, "seed")? {
        config.seed = Some(seed);
    }
    if let Some(threads) = parse_opt::<usize>(matches, "threads")? {
        config.threads = Some(threads);
    }

    Ok(config)
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

///
/// Write a comparison as a tab-separated table with a header line.
/// Values of non-evaluable regions are written as `NA`.
///
pub fn write_tsv<W: Write>(comparison: &Comparison, mut out: W) -> Result<()> {
    writeln!(out, "{}", TSV_HEADER.join("\t"))?;
    for r in comparison.results() {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.consensus_id,
            r.chr,
            r.start,
            r.end,
            r.strand,
            r.region_id_1,
            r.region_id_2,
            r.distance,
            r.total_1,
            r.total_2,
            fmt_opt(r.ems),
            fmt_opt(r.p_value),
            fmt_opt(r.q_value),
            r.significant,
            r.direction.as_str(),
            r.status.as_str(),
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(comparison: &Comparison, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, comparison)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub fn run_shift_cmd(matches: &ArgMatches) -> Result<()> {
    let sample_1 = matches
        .get_one::<String>("sample-1")
        .context("--sample-1 is required")?;
    let sample_2 = matches
        .get_one::<String>("sample-2")
        .context("--sample-2 is required")?;

    let group_1 = load_group(sample_1, matches.get_one::<String>("name-1"))?;
    let group_2 = load_group(sample_2, matches.get_one::<String>("name-2"))?;
    if group_1.name() == group_2.name() {
        bail!(
            "Both sample groups are named '{}'. Use --name-1/--name-2 to tell them apart",
            group_1.name()
        );
    }

    let config = resolve_config(matches, group_1.name(), group_2.name())?;
    info!(
        sample_1 = %sample_1,
        sample_2 = %sample_2,
        regions_1 = group_1.len(),
        regions_2 = group_2.len(),
        tss_1 = group_1.total_count(),
        tss_2 = group_2.total_count(),
        "loaded sample groups"
    );

    let groups: SampleGroups = [group_1, group_2].into_iter().collect();
    let comparison = run_shift(&groups, &config)?;
    info!(seed = comparison.seed(), "{}", comparison.summary());

    let out = open_output(matches.get_one::<String>("output"))?;
    match matches.get_one::<String>("format").map(|f| f.as_str()) {
        Some("json") => write_json(&comparison, out)?,
        _ => write_tsv(&comparison, out)?,
    }

    if let Some(path) = matches.get_one::<String>("output") {
        info!("Output written to {}", path);
    }

    Ok(())
}
