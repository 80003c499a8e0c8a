//! Per-patient summary rows.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::ids::PatientId;

/// Named statistics produced by one aggregator call.
pub type StatRecord = BTreeMap<String, f64>;

/// One output row: every statistic computed for a patient.
///
/// Keys are namespaced by variable (and exposure condition), so aggregators
/// write disjoint key sets; [`PatientSummary::extend_disjoint`] enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSummary {
    pub patient_id: PatientId,
    pub values: StatRecord,
}

impl PatientSummary {
    pub fn new(patient_id: impl Into<PatientId>) -> Self {
        Self {
            patient_id: patient_id.into(),
            values: StatRecord::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Result<()> {
        let key = key.into();
        if self.values.contains_key(&key) {
            return Err(ModelError::DuplicateStatistic {
                patient_id: self.patient_id.to_string(),
                key,
            });
        }
        self.values.insert(key, value);
        Ok(())
    }

    pub fn extend_disjoint(&mut self, record: StatRecord) -> Result<()> {
        for (key, value) in record {
            self.insert(key, value)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
