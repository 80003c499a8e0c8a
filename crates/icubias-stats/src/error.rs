//! Error types for statistical comparisons.

use thiserror::Error;

/// Reasons a comparison cannot produce a result.
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    /// Column absent from the table.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// Column present but without a single usable value.
    #[error("column '{column}' has no non-missing values")]
    EmptyColumn { column: String },

    /// Requested group label has no row with a usable value.
    #[error("group '{group}' not found in column '{column}'")]
    GroupNotFound { group: String, column: String },

    /// Fewer observations or groups than the test needs.
    #[error("{test} needs at least {needed} {unit}, found {found}")]
    InsufficientData {
        test: &'static str,
        unit: &'static str,
        needed: usize,
        found: usize,
    },

    /// Input for which the statistic is undefined, such as constant values.
    #[error("{test} is undefined: {reason}")]
    Degenerate { test: &'static str, reason: String },

    /// A request lacks an input the test needs.
    #[error("{test} requires {argument}")]
    MissingArgument {
        test: &'static str,
        argument: &'static str,
    },

    /// A cell of the expected contingency table is zero.
    #[error("contingency table has a zero expected frequency at row '{row}', column '{column}'")]
    ZeroExpected { row: String, column: String },

    /// The statistics backend rejected the samples.
    #[error("{test} failed: {message}")]
    Computation { test: &'static str, message: String },

    /// Reference distribution could not be built.
    #[error("invalid reference distribution: {message}")]
    Distribution { message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for StatsError {
    fn from(error: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: error.to_string(),
        }
    }
}

impl StatsError {
    pub(crate) fn computation<E: std::fmt::Display>(test: &'static str) -> impl FnOnce(E) -> Self {
        move |error| Self::Computation {
            test,
            message: error.to_string(),
        }
    }
}

/// Result type for statistical comparisons.
pub type Result<T> = std::result::Result<T, StatsError>;
