//! Observation streams: the per-patient, per-variable input of every aggregator.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::ids::PatientId;

/// Absolute measurement time. All streams of a run share one clock.
pub type Timestamp = NaiveDateTime;

/// A single non-missing measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: Timestamp,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Time-ordered observations of one variable for one patient.
///
/// Timestamps are strictly ascending and no value is missing. Construct it
/// with [`ObservationStream::from_observations`], which sorts the input and
/// collapses duplicate timestamps (the first observation at a timestamp wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationStream {
    observations: Vec<Observation>,
}

impl ObservationStream {
    pub fn from_observations(mut observations: Vec<Observation>) -> Self {
        observations.retain(|obs| !obs.value.is_nan());
        // Stable sort keeps the first row for each timestamp in front.
        observations.sort_by_key(|obs| obs.timestamp);
        observations.dedup_by_key(|obs| obs.timestamp);
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.value).collect()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }
}

impl FromIterator<Observation> for ObservationStream {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::from_observations(iter.into_iter().collect())
    }
}

/// Every stream of one patient, keyed by variable identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientStreams {
    pub patient_id: PatientId,
    pub streams: BTreeMap<String, ObservationStream>,
}

impl PatientStreams {
    pub fn new(patient_id: impl Into<PatientId>) -> Self {
        Self {
            patient_id: patient_id.into(),
            streams: BTreeMap::new(),
        }
    }

    pub fn with_stream(mut self, variable: impl Into<String>, stream: ObservationStream) -> Self {
        self.streams.insert(variable.into(), stream);
        self
    }

    /// Stream of a variable; absent variables behave as empty streams.
    pub fn stream(&self, variable: &str) -> Option<&ObservationStream> {
        self.streams.get(variable)
    }
}
