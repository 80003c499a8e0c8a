//! Typed column extraction with missing values kept as `None`.
//!
//! Columns are cast rather than matched on their dtype, so a table read as
//! text and a table built in memory give the same values.

use polars::prelude::{DataFrame, DataType, PolarsResult};

/// Reads a column as floats. Nulls, NaN and unparseable strings become `None`.
pub fn column_f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let casted = column.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect())
}

/// Reads a column as trimmed string labels. Nulls and blank cells become `None`.
pub fn column_labels(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    let casted = column.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|value| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
        .collect())
}
