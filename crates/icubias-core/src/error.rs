//! Error type for per-patient analysis.

use thiserror::Error;

use icubias_ingest::IngestError;
use icubias_model::{ConfigError, ModelError};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("failed to build summary frame: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
