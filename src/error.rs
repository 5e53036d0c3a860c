use std::collections::TryReserveError;

use thiserror::Error;

/// Errors surfaced by corpus construction, configuration and I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// Unsupported representation/metric pairing or an unknown name.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },

    /// Buffer length or row width does not match the declared shape.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Allocation failure while building a corpus or growing a neighbor set.
    #[error("allocation failure: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("empty input")]
    EmptyInput,

    #[error("could not parse '{value}' at line {line}, column {column}")]
    Parse {
        line: usize,
        column: usize,
        value: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
