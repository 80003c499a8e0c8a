//! Error types shared by the analysis crates.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or combining model values.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// Two aggregators tried to write the same statistic for one patient.
    #[error("statistic '{key}' written twice for patient {patient_id}")]
    DuplicateStatistic { patient_id: String, key: String },

    /// An exposure window must end strictly after it starts.
    #[error("exposure window must end after it starts")]
    EmptyWindow,
}

/// Fatal configuration problems. A run never starts while one is present.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is scheduled for missingness analysis without a period.
    #[error("variable '{variable}' has no expected sampling period configured")]
    MissingExpectedPeriod { variable: String },

    /// Expected periods must be strictly positive.
    #[error("expected sampling period for '{variable}' must be positive")]
    NonPositivePeriod { variable: String },

    /// No exposure variable was configured while conditioned statistics were requested.
    #[error("conditioned variables {variables:?} require at least one exposure variable")]
    NoExposureVariables { variables: Vec<String> },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
