mod matching;
mod shift;
mod utils;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "tsrshift";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Detect shifts in transcription start site usage between two conditions.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log per-region decisions (debug level)"),
        )
        .subcommand(shift::cli::create_shift_cli())
        .subcommand(matching::cli::create_match_cli())
}

///
/// Log to stderr so tables written to stdout stay clean. `RUST_LOG` is
/// honoured unless `--verbose` is given.
///
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // SHIFT
        //
        Some((shift::cli::SHIFT_CMD, matches)) => {
            shift::handlers::run_shift_cmd(matches)?;
        }

        //
        // MATCH
        //
        Some((matching::cli::MATCH_CMD, matches)) => {
            matching::handlers::run_match(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_verbose_is_global() {
        let matches = build_parser()
            .try_get_matches_from(["tsrshift", "match", "--sample-1", "a", "--sample-2", "b", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }
}
