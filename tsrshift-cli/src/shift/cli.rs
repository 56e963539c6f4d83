use clap::{Arg, Command};

pub const SHIFT_CMD: &str = "shift";
pub const DEFAULT_FORMAT: &str = "tsv";

pub fn create_shift_cli() -> Command {
    Command::new(SHIFT_CMD)
        .about("Detect TSS shifts between two sample groups. Writes one row per consensus region.")
        .arg(
            Arg::new("sample-1")
                .long("sample-1")
                .required(true)
                .help("TSS count table of the reference condition (tsv, optionally gzipped)"),
        )
        .arg(
            Arg::new("sample-2")
                .long("sample-2")
                .required(true)
                .help("TSS count table of the compared condition (tsv, optionally gzipped)"),
        )
        .arg(
            Arg::new("name-1")
                .long("name-1")
                .help("Name of the reference condition (default: file name of --sample-1)"),
        )
        .arg(
            Arg::new("name-2")
                .long("name-2")
                .help("Name of the compared condition (default: file name of --sample-2)"),
        )
        .arg(
            Arg::new("comparison-name")
                .long("comparison-name")
                .help("Name of the comparison (default: <name-1>_vs_<name-2>)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file with comparison parameters. Flags override its values"),
        )
        .arg(
            Arg::new("max-distance")
                .long("max-distance")
                .help("Largest midpoint distance in bp at which two regions are paired [default: 100]"),
        )
        .arg(
            Arg::new("min-threshold")
                .long("min-threshold")
                .help("Minimum total count of a region in its own sample group [default: 10]"),
        )
        .arg(
            Arg::new("n-resamples")
                .long("n-resamples")
                .help("Number of label permutations per region [default: 1000]"),
        )
        .arg(
            Arg::new("fdr")
                .long("fdr")
                .help("q-value threshold for significance [default: 0.05]"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Base seed of the permutation test (default: drawn at random and reported)"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('p')
                .help("Number of worker threads (default: all cores)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["tsv", "json"])
                .default_value(DEFAULT_FORMAT)
                .help("Output format"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file (default: stdout)"),
        )
}
