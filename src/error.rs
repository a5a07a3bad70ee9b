//! Errors raised while loading or writing approach data.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading the source files or writing results.
#[derive(Error, Debug)]
pub enum Error {
    /// Opening, reading or writing a file failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tabular parse or write failure (includes ragged rows)
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Structured document is not valid JSON or could not be serialized
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Header row lacks a required column
    #[error("{path}: missing required column `{column}`")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// Structured document lacks a required top-level member
    #[error("{path}: missing top-level member `{section}`")]
    MissingSection { path: PathBuf, section: &'static str },

    /// A data row does not line up with the declared field names
    #[error("{path}: row {row} has {found} values but {expected} fields are declared")]
    RowLength {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A required field is absent from a row
    #[error("{path}: row {row} is missing required field `{field}`")]
    MissingField {
        path: PathBuf,
        row: usize,
        field: &'static str,
    },

    /// A required numeric field could not be parsed
    #[error("{path}: row {row} field `{field}` is not a number: {value:?}")]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        field: &'static str,
        value: String,
    },

    /// The close-approach timestamp did not match `YYYY-Mon-DD hh:mm`
    #[error("{path}: row {row} field `{field}` is not a valid timestamp: {value:?}")]
    InvalidTimestamp {
        path: PathBuf,
        row: usize,
        field: &'static str,
        value: String,
    },

    /// Output path has an extension no writer handles
    #[error("unsupported output format for {path} (expected .csv or .json)")]
    UnsupportedFormat { path: PathBuf },

    /// Bad value in an environment setting
    #[error("invalid setting {key}={value:?}")]
    Config { key: &'static str, value: String },
}
