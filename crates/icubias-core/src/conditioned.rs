//! Statistics of a variable split by exposure state.

use icubias_model::{ObservationStream, StatRecord, WindowSet};

use crate::interval::summarize_values;

/// Values of one stream split by whether their timestamp falls in an exposure window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub exposed: Vec<f64>,
    pub unexposed: Vec<f64>,
}

/// Splits a stream against the patient's exposure union.
///
/// Every observation lands in exactly one side.
pub fn partition_by_exposure(stream: &ObservationStream, exposure: &WindowSet) -> Partition {
    let mut partition = Partition::default();
    for obs in stream.iter() {
        if exposure.contains(obs.timestamp) {
            partition.exposed.push(obs.value);
        } else {
            partition.unexposed.push(obs.value);
        }
    }
    partition
}

/// Conditioned statistics of `var`, keyed `{stat}_{var}_with_exposure` and
/// `{stat}_{var}_without_exposure`. An empty side contributes no keys.
pub fn partition_and_summarize(
    stream: &ObservationStream,
    exposure: &WindowSet,
    var: &str,
) -> StatRecord {
    let partition = partition_by_exposure(stream, exposure);
    let mut record = StatRecord::new();
    if let Some(with) = summarize_values(&partition.exposed, &format!("{var}_with_exposure")) {
        record.extend(with);
    }
    if let Some(without) =
        summarize_values(&partition.unexposed, &format!("{var}_without_exposure"))
    {
        record.extend(without);
    }
    record
}
