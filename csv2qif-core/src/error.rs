//! Error types shared by every csv2qif crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Unknown account alias: {0}")]
    UnknownAlias(String),

    #[error("Unknown text encoding '{encoding}' in format {format}")]
    UnknownEncoding { format: String, encoding: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid amount '{value}'")]
    InvalidAmount { value: String },

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Row {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Worker failed: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// True for errors caused by the configuration document or CLI selection
    /// rather than by the input data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownFormat(_)
                | Error::UnknownAlias(_)
                | Error::UnknownEncoding { .. }
                | Error::InvalidConfig(_)
                | Error::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
