//! Reading and writing summary tables, and joining cohort labels onto them.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, IntoColumn, NamedFrom, SerWriter, Series};
use tracing::{debug, info};

use icubias_common::column_labels;
use icubias_ingest::{CohortTable, read_measurement_table};
use icubias_model::PatientId;

/// File name of the per-patient summary written by `analyze`.
pub const SUMMARY_FILE_NAME: &str = "msrt_stats_patients.csv";

/// `<data_dir>/output/msrt_stats_patients.csv`
pub fn default_output_path(data_dir: &Path) -> PathBuf {
    data_dir.join("output").join(SUMMARY_FILE_NAME)
}

/// Writes `df` as CSV, creating parent directories as needed.
pub fn write_summary_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("create output file {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write summary table {}", path.display()))?;
    info!(path = %path.display(), rows = df.height(), "wrote summary table");
    Ok(())
}

/// Reads a summary table. Numeric columns are converted when a test reads them.
pub fn read_summary_table(path: &Path) -> Result<DataFrame> {
    read_measurement_table(path).with_context(|| format!("read summary table {}", path.display()))
}

/// Adds one string column per cohort attribute, aligned on `id_column`.
///
/// Patients missing from the cohort table and patients whose attribute is
/// unresolved get a null label, so they drop out of group comparisons. An
/// attribute named like an existing column replaces it.
pub fn attach_cohorts(df: &DataFrame, cohorts: &CohortTable, id_column: &str) -> Result<DataFrame> {
    let ids = column_labels(df, id_column)
        .with_context(|| format!("summary table has no '{id_column}' column"))?;
    let mut joined = df.clone();
    for attribute in &cohorts.columns {
        let labels: Vec<Option<String>> = ids
            .iter()
            .map(|id| {
                let id = PatientId::new(id.as_deref()?);
                cohorts.label(&id, attribute).map(str::to_string)
            })
            .collect();
        joined
            .with_column(Series::new(attribute.as_str().into(), labels).into_column())
            .with_context(|| format!("attach cohort attribute '{attribute}'"))?;
    }
    debug!(
        attributes = cohorts.columns.len(),
        patients = ids.len(),
        "attached cohort labels"
    );
    Ok(joined)
}
