//! Error types for measurement ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while locating and loading input tables.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("data directory {path} does not exist")]
    DirectoryNotFound { path: PathBuf },

    #[error("cannot list {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Polars could not load a measurement file.
    #[error("cannot parse {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// A cohort table row could not be read.
    #[error("bad record in {path}: {source}")]
    CsvRecord {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no '{column}' column")]
    MissingColumn { column: String, path: PathBuf },

    #[error("table has no '{column}' column")]
    ColumnNotFound { column: String },

    #[error("polars: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(error: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
