//! Wide summary table: one row per patient, merged across input files.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame};

use icubias_model::{PatientId, PatientSummary, Resolution};

use crate::error::Result;
use crate::patient::{END_TIME_KEY, LENGTH_OF_STAY_KEY, START_TIME_KEY};

/// Column holding the patient identifier in the exported frame.
pub const PATIENT_ID_COLUMN: &str = "patient_id";

const SECONDS_PER_DAY: f64 = 86_400.0;

type Row = BTreeMap<String, Resolution<f64>>;

/// How two values of the same key are combined when a patient appears twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeRule {
    Min,
    Max,
    Sum,
    Agree,
}

impl MergeRule {
    fn for_key(key: &str) -> Self {
        if key.starts_with("nb_") {
            Self::Sum
        } else if key.starts_with("start_") || key.starts_with("min_") {
            Self::Min
        } else if key.starts_with("end_") || key.starts_with("max_") {
            Self::Max
        } else {
            Self::Agree
        }
    }

    fn combine(self, left: Resolution<f64>, right: Resolution<f64>) -> Resolution<f64> {
        let (Resolution::Resolved(a), Resolution::Resolved(b)) = (left, right) else {
            return Resolution::Unresolved;
        };
        match self {
            Self::Min => Resolution::Resolved(a.min(b)),
            Self::Max => Resolution::Resolved(a.max(b)),
            Self::Sum => Resolution::Resolved(a + b),
            Self::Agree if a == b => Resolution::Resolved(a),
            Self::Agree => Resolution::Unresolved,
        }
    }
}

/// Per-patient statistic rows keyed by patient id.
///
/// [`SummaryTable::merge`] is associative and commutative, so per-file tables
/// can be reduced in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    rows: BTreeMap<PatientId, Row>,
}

impl SummaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_summaries(summaries: impl IntoIterator<Item = PatientSummary>) -> Self {
        let mut table = Self::new();
        for summary in summaries {
            table.insert_summary(summary);
        }
        table
    }

    /// Adds one patient row, merging with an existing row of the same patient.
    pub fn insert_summary(&mut self, summary: PatientSummary) {
        let row: Row = summary
            .values
            .into_iter()
            .map(|(key, value)| (key, Resolution::Resolved(value)))
            .collect();
        self.insert_row(summary.patient_id, row);
    }

    fn insert_row(&mut self, patient_id: PatientId, row: Row) {
        match self.rows.get_mut(&patient_id) {
            Some(existing) => merge_rows(existing, row),
            None => {
                self.rows.insert(patient_id, row);
            }
        }
    }

    /// Union of two tables by patient id.
    ///
    /// For a patient present on both sides, `start_*` and `min_*` keep the
    /// minimum, `end_*` and `max_*` the maximum, `nb_*` add up, and
    /// `length_of_stay_days` follows the widened extent. Any other differing
    /// value becomes [`Resolution::Unresolved`] and stays so.
    pub fn merge(mut self, other: SummaryTable) -> SummaryTable {
        for (patient_id, row) in other.rows {
            self.insert_row(patient_id, row);
        }
        self
    }

    pub fn get(&self, patient_id: &PatientId, key: &str) -> Option<Resolution<f64>> {
        self.rows.get(patient_id)?.get(key).copied()
    }

    pub fn patient_ids(&self) -> impl Iterator<Item = &PatientId> {
        self.rows.keys()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every statistic name present in at least one row, sorted.
    pub fn column_names(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self.rows.values().flat_map(|row| row.keys()).collect();
        names.into_iter().cloned().collect()
    }

    /// Number of cells left unresolved by merging.
    pub fn unresolved_count(&self) -> usize {
        self.rows
            .values()
            .flat_map(|row| row.values())
            .filter(|cell| cell.is_unresolved())
            .count()
    }

    /// Exports the table: `patient_id` first, then one Float64 column per
    /// statistic in name order. Absent and unresolved cells are null.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let names = self.column_names();
        let mut columns = Vec::with_capacity(names.len() + 1);
        columns.push(Column::new(
            PATIENT_ID_COLUMN.into(),
            self.rows.keys().map(PatientId::as_str).collect::<Vec<_>>(),
        ));
        for name in &names {
            let values: Vec<Option<f64>> = self
                .rows
                .values()
                .map(|row| row.get(name).and_then(|cell| cell.as_resolved().copied()))
                .collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

fn merge_rows(existing: &mut Row, incoming: Row) {
    for (key, value) in incoming {
        match existing.get_mut(&key) {
            Some(current) => *current = MergeRule::for_key(&key).combine(*current, value),
            None => {
                existing.insert(key, value);
            }
        }
    }
    recompute_length_of_stay(existing);
}

fn recompute_length_of_stay(row: &mut Row) {
    let start = row.get(START_TIME_KEY).and_then(|c| c.as_resolved().copied());
    let end = row.get(END_TIME_KEY).and_then(|c| c.as_resolved().copied());
    if let (Some(start), Some(end)) = (start, end) {
        row.insert(
            LENGTH_OF_STAY_KEY.to_string(),
            Resolution::Resolved((end - start) / SECONDS_PER_DAY),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, values: &[(&str, f64)]) -> PatientSummary {
        let mut summary = PatientSummary::new(id);
        for (key, value) in values {
            summary.insert(*key, *value).unwrap();
        }
        summary
    }

    #[test]
    fn duplicate_patient_merges_by_key_family() {
        let first = SummaryTable::from_summaries([summary(
            "P1",
            &[
                ("start_time", 0.0),
                ("end_time", 86_400.0),
                ("length_of_stay_days", 1.0),
                ("nb_msrt_vm1", 10.0),
                ("min_vm1", 60.0),
                ("max_vm1", 120.0),
                ("mean_vm1", 80.0),
                ("median_vm1", 79.0),
            ],
        )]);
        let second = SummaryTable::from_summaries([summary(
            "P1",
            &[
                ("start_time", 43_200.0),
                ("end_time", 172_800.0),
                ("length_of_stay_days", 1.5),
                ("nb_msrt_vm1", 5.0),
                ("min_vm1", 55.0),
                ("max_vm1", 100.0),
                ("mean_vm1", 85.0),
                ("median_vm1", 79.0),
            ],
        )]);
        let merged = first.merge(second);
        let p1 = PatientId::from("P1");
        assert_eq!(merged.get(&p1, "start_time"), Some(Resolution::Resolved(0.0)));
        assert_eq!(merged.get(&p1, "end_time"), Some(Resolution::Resolved(172_800.0)));
        assert_eq!(
            merged.get(&p1, "length_of_stay_days"),
            Some(Resolution::Resolved(2.0))
        );
        assert_eq!(merged.get(&p1, "nb_msrt_vm1"), Some(Resolution::Resolved(15.0)));
        assert_eq!(merged.get(&p1, "min_vm1"), Some(Resolution::Resolved(55.0)));
        assert_eq!(merged.get(&p1, "max_vm1"), Some(Resolution::Resolved(120.0)));
        assert_eq!(merged.get(&p1, "mean_vm1"), Some(Resolution::Unresolved));
        assert_eq!(merged.get(&p1, "median_vm1"), Some(Resolution::Resolved(79.0)));
        assert_eq!(merged.unresolved_count(), 1);
    }

    #[test]
    fn unresolved_absorbs_later_agreement() {
        let a = SummaryTable::from_summaries([summary("P1", &[("mean_vm1", 1.0)])]);
        let b = SummaryTable::from_summaries([summary("P1", &[("mean_vm1", 2.0)])]);
        let c = SummaryTable::from_summaries([summary("P1", &[("mean_vm1", 1.0)])]);
        let merged = a.merge(b).merge(c);
        assert_eq!(
            merged.get(&PatientId::from("P1"), "mean_vm1"),
            Some(Resolution::Unresolved)
        );
    }

    #[test]
    fn disjoint_patients_are_unioned() {
        let a = SummaryTable::from_summaries([summary("P2", &[("mean_vm1", 1.0)])]);
        let b = SummaryTable::from_summaries([summary("P1", &[("mean_vm5", 2.0)])]);
        let merged = a.merge(b);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.column_names(), vec!["mean_vm1", "mean_vm5"]);
    }

    #[test]
    fn dataframe_has_id_first_and_nulls_for_gaps() {
        let table = SummaryTable::from_summaries([
            summary("P2", &[("mean_vm1", 1.0)]),
            summary("P1", &[("mean_vm5", 2.0), ("mean_vm1", 3.0)]),
        ])
        .merge(SummaryTable::from_summaries([summary(
            "P1",
            &[("mean_vm5", 4.0)],
        )]));
        let df = table.to_dataframe().unwrap();
        assert_eq!(
            df.get_column_names_str(),
            vec!["patient_id", "mean_vm1", "mean_vm5"]
        );
        assert_eq!(df.height(), 2);
        let mean_vm5 = df.column("mean_vm5").unwrap().f64().unwrap();
        assert_eq!(mean_vm5.get(0), None);
        assert_eq!(mean_vm5.get(1), None);
        let mean_vm1 = df.column("mean_vm1").unwrap().f64().unwrap();
        assert_eq!(mean_vm1.get(0), Some(3.0));
        assert_eq!(mean_vm1.get(1), Some(1.0));
    }
}
