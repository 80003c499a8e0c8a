//! Cohort attribute tables.
//!
//! A cohort table carries categorical patient attributes (sex, ethnicity,
//! insurance, ...) used to split patients into comparison groups. A patient
//! may appear on several rows, for instance once per admission; the values
//! of each column are reconciled with [`resolve_category`], and patients
//! whose values conflict stay [`Resolution::Unresolved`].

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{info, warn};

use icubias_model::{DEFAULT_ABSORBING_CATEGORIES, PatientId, Resolution, resolve_category};

use crate::error::{IngestError, Result};

/// Per-patient categorical attributes.
#[derive(Debug, Clone, Default)]
pub struct CohortTable {
    /// Attribute columns in file order, id column excluded.
    pub columns: Vec<String>,
    pub attributes: BTreeMap<PatientId, BTreeMap<String, Resolution<String>>>,
}

impl CohortTable {
    /// Resolved label of a patient for an attribute column.
    pub fn label(&self, patient_id: &PatientId, column: &str) -> Option<&str> {
        self.attributes
            .get(patient_id)?
            .get(column)?
            .as_resolved()
            .map(String::as_str)
    }

    /// Number of patients whose values for `column` could not be reconciled.
    pub fn unresolved_count(&self, column: &str) -> usize {
        self.attributes
            .values()
            .filter(|attrs| attrs.get(column).is_some_and(Resolution::is_unresolved))
            .count()
    }

    pub fn patient_count(&self) -> usize {
        self.attributes.len()
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a cohort table, merging repeated patients column by column.
pub fn read_cohort_table(path: &Path, id_column: &str) -> Result<CohortTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::CsvRecord {
            path: path.to_path_buf(),
            source,
        })?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::CsvRecord {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(normalize_cell)
        .collect();
    let id_idx = headers
        .iter()
        .position(|h| h == id_column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: id_column.to_string(),
            path: path.to_path_buf(),
        })?;

    let mut raw: BTreeMap<PatientId, BTreeMap<usize, Vec<String>>> = BTreeMap::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvRecord {
            path: path.to_path_buf(),
            source,
        })?;
        let Some(id) = record.get(id_idx).map(normalize_cell).filter(|v| !v.is_empty()) else {
            continue;
        };
        let entry = raw.entry(PatientId::from(id)).or_default();
        for (idx, value) in record.iter().enumerate() {
            if idx == id_idx || idx >= headers.len() {
                continue;
            }
            entry.entry(idx).or_default().push(normalize_cell(value));
        }
    }

    let mut attributes = BTreeMap::new();
    for (patient_id, by_column) in raw {
        let mut resolved = BTreeMap::new();
        for (idx, values) in by_column {
            if let Some(resolution) = resolve_category(&values, DEFAULT_ABSORBING_CATEGORIES) {
                resolved.insert(headers[idx].clone(), resolution);
            }
        }
        attributes.insert(patient_id, resolved);
    }

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != id_idx)
        .map(|(_, h)| h.clone())
        .collect();
    let table = CohortTable {
        columns,
        attributes,
    };
    for column in &table.columns {
        let unresolved = table.unresolved_count(column);
        if unresolved > 0 {
            warn!(
                column = %column,
                unresolved,
                "patients with conflicting values left unresolved"
            );
        }
    }
    info!(
        source_filename = %path.display(),
        patient_count = table.patient_count(),
        "loaded cohort table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn merges_repeated_patients() {
        let file = create_temp_csv(
            "SUBJECT_ID,ETHNICITY,SEX\n\
             1,UNK,F\n\
             1,WHITE,F\n\
             2,WHITE,M\n\
             2,BLACK,M\n\
             3,,M\n",
        );
        let table = read_cohort_table(file.path(), "SUBJECT_ID").unwrap();

        assert_eq!(table.columns, vec!["ETHNICITY".to_string(), "SEX".to_string()]);
        assert_eq!(table.label(&"1".into(), "ETHNICITY"), Some("WHITE"));
        assert_eq!(table.label(&"2".into(), "ETHNICITY"), None);
        assert_eq!(table.label(&"2".into(), "SEX"), Some("M"));
        assert_eq!(table.label(&"3".into(), "ETHNICITY"), None);
        assert_eq!(table.unresolved_count("ETHNICITY"), 1);
        assert_eq!(table.patient_count(), 3);
    }

    #[test]
    fn missing_id_column_is_reported() {
        let file = create_temp_csv("A,B\n1,2\n");
        let err = read_cohort_table(file.path(), "SUBJECT_ID").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }
}
