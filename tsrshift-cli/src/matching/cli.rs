use clap::{Arg, Command};

pub const MATCH_CMD: &str = "match";

pub fn create_match_cli() -> Command {
    Command::new(MATCH_CMD)
        .about("Pair comparable regions of two sample groups. Outputs chr, start, end, strand, id_1, id_2, distance.")
        .arg(
            Arg::new("sample-1")
                .long("sample-1")
                .required(true)
                .help("TSS count table of the reference condition"),
        )
        .arg(
            Arg::new("sample-2")
                .long("sample-2")
                .required(true)
                .help("TSS count table of the compared condition"),
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
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output file (default: stdout)"),
        )
}
