use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;

///
/// Parse an optional string argument into `T`.
///
pub fn parse_opt<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .get_one::<String>(name)
        .map(|value| {
            value
                .parse::<T>()
                .with_context(|| format!("--{} got an invalid value: '{}'", name, value))
        })
        .transpose()
}

///
/// Writer for the `--output` file, or stdout when none was given.
///
pub fn open_output(path: Option<&String>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::{Arg, Command};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn matches(args: &[&str]) -> ArgMatches {
        Command::new("test")
            .arg(Arg::new("seed").long("seed"))
            .try_get_matches_from(args)
            .unwrap()
    }

    #[rstest]
    fn test_parse_opt_present() {
        let m = matches(&["test", "--seed", "42"]);
        assert_eq!(parse_opt::<u64>(&m, "seed").unwrap(), Some(42));
    }

    #[rstest]
    fn test_parse_opt_absent() {
        let m = matches(&["test"]);
        assert_eq!(parse_opt::<u64>(&m, "seed").unwrap(), None);
    }

    #[rstest]
    fn test_parse_opt_invalid() {
        let m = matches(&["test", "--seed", "forty"]);
        let err = parse_opt::<u64>(&m, "seed").unwrap_err();
        assert!(err.to_string().contains("--seed"));
    }
}
