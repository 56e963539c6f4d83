use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Invalid strand '{0}': expected one of '+', '-', '*' or '.'")]
    InvalidStrand(String),

    #[error("Invalid region {chr}:{start}-{end}: start must be lower than end")]
    InvalidRegion { chr: String, start: u32, end: u32 },

    #[error("Error parsing line {line}: {reason}")]
    ParseError { line: usize, reason: String },

    #[error("Position {position} lies outside region {region}")]
    PositionOutsideRegion { region: String, position: u32 },

    #[error("Region id '{0}' is used with conflicting coordinates")]
    ConflictingRegion(String),

    #[error("Corrupted file. 0 regions found in the file: {0}")]
    EmptySampleGroup(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
