//! CSV loading through Polars.

use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Reads a measurement file into a DataFrame.
///
/// Every column is read as text; numeric conversion happens per column when
/// streams are built, so a variable that is empty for the first rows of a
/// file cannot be mistyped by schema inference.
pub fn read_measurement_table(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(
        source_filename = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read measurement table"
    );
    Ok(df)
}
