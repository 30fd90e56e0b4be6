use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn the configured data file into a record table.
/// Always fatal at startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("malformed CSV in {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed Parquet in {}", .path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("row {row}: {message}")]
    Malformed { row: usize, message: String },

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// A selector received a value outside its enumerated option list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for selector '{selector}'")]
pub struct InvalidSelectorValue {
    pub selector: &'static str,
    pub value: String,
}
