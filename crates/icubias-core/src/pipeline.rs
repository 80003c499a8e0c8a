//! Per-file and per-patient analysis driven in parallel.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use rayon::prelude::*;
use tracing::{debug, info, info_span};

use icubias_ingest::{StreamColumns, build_patient_streams, read_measurement_table};
use icubias_model::{AnalysisConfig, PatientStreams};

use crate::error::Result;
use crate::patient::analyze_patient;
use crate::table::SummaryTable;

/// Outcome of analysing one measurement table.
#[derive(Debug, Clone, Default)]
pub struct TableAnalysis {
    pub table: SummaryTable,
    /// Patients with at least one row in the input.
    pub patient_count: usize,
    /// Rows dropped for a missing id or unparseable timestamp.
    pub skipped_rows: usize,
    /// Configured variables with no column in the input.
    pub missing_variables: Vec<String>,
}

/// Outcome of analysing one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub patient_count: usize,
    pub skipped_rows: usize,
    pub missing_variables: Vec<String>,
}

/// Merged table of a whole run plus per-file bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub table: SummaryTable,
    pub files: Vec<FileReport>,
}

/// Summarises patients in parallel. Patients with nothing computable get no row.
pub fn analyze_patients(patients: &[PatientStreams], config: &AnalysisConfig) -> Result<SummaryTable> {
    config.validate()?;
    let summaries = patients
        .par_iter()
        .map(|patient| analyze_patient(patient, config))
        .collect::<Result<Vec<_>>>()?;
    let (kept, empty): (Vec<_>, Vec<_>) = summaries.into_iter().partition(|s| !s.is_empty());
    if !empty.is_empty() {
        debug!(
            empty_patients = empty.len(),
            "patients without any computable statistic"
        );
    }
    Ok(SummaryTable::from_summaries(kept))
}

/// Splits a measurement table into patients and summarises them.
pub fn analyze_table(df: &DataFrame, config: &AnalysisConfig) -> Result<TableAnalysis> {
    config.validate()?;
    let columns = StreamColumns {
        patient_column: config.patient_column.clone(),
        timestamp_column: config.timestamp_column.clone(),
        variables: config.required_variables(),
    };
    let build = build_patient_streams(df, &columns)?;
    let table = analyze_patients(&build.patients, config)?;
    Ok(TableAnalysis {
        table,
        patient_count: build.patients.len(),
        skipped_rows: build.skipped_rows,
        missing_variables: build.missing_variables,
    })
}

/// Reads and analyses one CSV file.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<(SummaryTable, FileReport)> {
    let span = info_span!("file", path = %path.display());
    let _guard = span.enter();
    let df = read_measurement_table(path)?;
    let analysis = analyze_table(&df, config)?;
    info!(
        patients = analysis.patient_count,
        rows = df.height(),
        "analysed file"
    );
    let report = FileReport {
        path: path.to_path_buf(),
        patient_count: analysis.patient_count,
        skipped_rows: analysis.skipped_rows,
        missing_variables: analysis.missing_variables,
    };
    Ok((analysis.table, report))
}

/// Analyses every file in parallel and merges the per-file tables.
///
/// The configuration is validated before any file is opened. A patient
/// split across files is merged with [`SummaryTable::merge`].
pub fn analyze_files(paths: &[PathBuf], config: &AnalysisConfig) -> Result<RunOutcome> {
    config.validate()?;
    let per_file = paths
        .par_iter()
        .map(|path| analyze_file(path, config))
        .collect::<Result<Vec<_>>>()?;
    let mut outcome = RunOutcome::default();
    for (table, report) in per_file {
        outcome.table = outcome.table.merge(table);
        outcome.files.push(report);
    }
    Ok(outcome)
}
