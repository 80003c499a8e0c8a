//! Conversion of a measurement table into per-patient observation streams.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{debug, warn};

use icubias_common::{column_f64_values, column_labels};
use icubias_model::{Observation, ObservationStream, PatientId, PatientStreams, Timestamp};

use crate::error::{IngestError, Result};
use crate::timestamp::parse_timestamp;

/// Columns to read from a measurement table.
#[derive(Debug, Clone)]
pub struct StreamColumns {
    pub patient_column: String,
    pub timestamp_column: String,
    pub variables: Vec<String>,
}

/// Streams of every patient of one table plus bookkeeping about dropped input.
#[derive(Debug, Clone, Default)]
pub struct StreamBuild {
    /// Patients sorted by id.
    pub patients: Vec<PatientStreams>,
    /// Rows without a patient id or with an unparseable timestamp.
    pub skipped_rows: usize,
    /// Requested variables with no column in the table.
    pub missing_variables: Vec<String>,
}

/// Splits a table into one [`PatientStreams`] per patient.
///
/// Each requested variable becomes a stream of its non-missing values.
/// Requested variables absent from the table are reported in
/// [`StreamBuild::missing_variables`] and yield no stream; the id and
/// timestamp columns are mandatory.
pub fn build_patient_streams(df: &DataFrame, columns: &StreamColumns) -> Result<StreamBuild> {
    let ids = column_labels(df, &columns.patient_column).map_err(|_| {
        IngestError::ColumnNotFound {
            column: columns.patient_column.clone(),
        }
    })?;
    let raw_times = column_labels(df, &columns.timestamp_column).map_err(|_| {
        IngestError::ColumnNotFound {
            column: columns.timestamp_column.clone(),
        }
    })?;

    let mut rows_by_patient: BTreeMap<PatientId, Vec<(usize, Timestamp)>> = BTreeMap::new();
    let mut skipped_rows = 0usize;
    for (idx, (id, raw_time)) in ids.into_iter().zip(raw_times).enumerate() {
        let timestamp = raw_time.as_deref().and_then(parse_timestamp);
        match (id, timestamp) {
            (Some(id), Some(timestamp)) => rows_by_patient
                .entry(PatientId::from(id))
                .or_default()
                .push((idx, timestamp)),
            _ => skipped_rows += 1,
        }
    }
    if skipped_rows > 0 {
        warn!(
            skipped_rows,
            "rows without patient id or parseable timestamp were skipped"
        );
    }

    let mut values_by_variable: Vec<(&str, Vec<Option<f64>>)> = Vec::new();
    let mut missing_variables = Vec::new();
    for variable in &columns.variables {
        if df.column(variable).is_err() {
            missing_variables.push(variable.clone());
            continue;
        }
        values_by_variable.push((variable.as_str(), column_f64_values(df, variable)?));
    }
    if !missing_variables.is_empty() {
        warn!(?missing_variables, "variables not present in table");
    }

    let patients: Vec<PatientStreams> = rows_by_patient
        .into_iter()
        .map(|(patient_id, rows)| {
            let mut patient = PatientStreams::new(patient_id);
            for (variable, values) in &values_by_variable {
                let observations = rows
                    .iter()
                    .filter_map(|(idx, timestamp)| {
                        values[*idx].map(|value| Observation::new(*timestamp, value))
                    })
                    .collect();
                let stream = ObservationStream::from_observations(observations);
                patient.streams.insert((*variable).to_string(), stream);
            }
            patient
        })
        .collect();

    debug!(
        patient_count = patients.len(),
        variable_count = values_by_variable.len(),
        "built patient streams"
    );
    Ok(StreamBuild {
        patients,
        skipped_rows,
        missing_variables,
    })
}
