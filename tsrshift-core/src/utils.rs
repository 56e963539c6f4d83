use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// Strip every extension from a file name, `a/ctrl.tss.tsv.gz` -> `ctrl`.
///
pub fn remove_all_extensions(path: &Path) -> String {
    let mut stem = match path.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => return String::new(),
    };

    while let Some((head, _ext)) = stem.rsplit_once('.') {
        if head.is_empty() {
            break;
        }
        stem = head.to_string();
    }

    stem
}
