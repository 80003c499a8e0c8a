//! Full summary row of one patient.

use tracing::trace;

use icubias_model::{
    AnalysisConfig, ConfigError, PatientStreams, PatientSummary, StatRecord, StayExtent,
    Timestamp,
};

use crate::conditioned::partition_and_summarize;
use crate::error::Result;
use crate::exposure::{ExposureOptions, track_patient_exposure};
use crate::gaps::detect_gaps;
use crate::interval::{summarize_gaps, summarize_values};

/// Key of the number of non-missing observations of a variable.
pub fn measurement_count_key(var: &str) -> String {
    format!("nb_msrt_{var}")
}

pub const START_TIME_KEY: &str = "start_time";
pub const END_TIME_KEY: &str = "end_time";
pub const LENGTH_OF_STAY_KEY: &str = "length_of_stay_days";

/// Epoch seconds of a naive UTC timestamp.
pub fn epoch_seconds(timestamp: Timestamp) -> f64 {
    timestamp.and_utc().timestamp_millis() as f64 / 1000.0
}

/// Stay extent keys: `start_time`, `end_time` (epoch seconds) and
/// `length_of_stay_days`.
pub fn stay_record(extent: &StayExtent) -> StatRecord {
    StatRecord::from([
        (START_TIME_KEY.to_string(), epoch_seconds(extent.start)),
        (END_TIME_KEY.to_string(), epoch_seconds(extent.end)),
        (LENGTH_OF_STAY_KEY.to_string(), extent.length_days()),
    ])
}

/// Computes every statistic the configuration asks for on one patient.
///
/// Variables the patient never had observed simply contribute no keys. An
/// empty summary means nothing at all could be computed.
pub fn analyze_patient(patient: &PatientStreams, config: &AnalysisConfig) -> Result<PatientSummary> {
    let mut summary = PatientSummary::new(patient.patient_id.clone());

    for var in &config.missingness_variables {
        let expected = config
            .expected_period(var)
            .ok_or_else(|| ConfigError::MissingExpectedPeriod {
                variable: var.clone(),
            })?;
        let Some(stream) = patient.stream(var).filter(|s| !s.is_empty()) else {
            continue;
        };
        summary.insert(measurement_count_key(var), stream.len() as f64)?;
        let report = detect_gaps(stream, expected);
        if let Some(record) = summarize_gaps(&report.gaps, report.missed, var) {
            summary.extend_disjoint(record)?;
        }
    }

    for var in &config.monitored_variables {
        if let Some(record) = patient
            .stream(var)
            .and_then(|stream| summarize_values(&stream.values(), var))
        {
            summary.extend_disjoint(record)?;
        }
    }

    if !config.conditioned_variables.is_empty() {
        let options = ExposureOptions {
            close_open_windows_at_stream_end: config.close_open_windows_at_stream_end,
        };
        let exposure = track_patient_exposure(patient, &config.exposure_variables, options);
        trace!(
            patient_id = %patient.patient_id,
            window_count = exposure.len(),
            "tracked exposure"
        );
        for var in &config.conditioned_variables {
            if let Some(stream) = patient.stream(var) {
                summary.extend_disjoint(partition_and_summarize(stream, &exposure, var))?;
            }
        }
    }

    let extent = config
        .anchor_variable
        .as_deref()
        .and_then(|anchor| patient.stream(anchor))
        .and_then(|stream| Some(StayExtent::new(stream.first()?.timestamp, stream.last()?.timestamp)));
    if let Some(extent) = extent {
        summary.extend_disjoint(stay_record(&extent))?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use icubias_model::{Observation, ObservationStream};

    fn at(seconds: i64) -> Timestamp {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    fn stream(samples: &[(i64, f64)]) -> ObservationStream {
        samples
            .iter()
            .map(|(t, v)| Observation::new(at(*t), *v))
            .collect()
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            missingness_variables: vec!["vm1".to_string()],
            monitored_variables: vec!["vm1".to_string()],
            conditioned_variables: vec!["vm1".to_string()],
            exposure_variables: vec!["pm39".to_string()],
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn full_row_for_a_patient() {
        let patient = PatientStreams::new("P1")
            .with_stream(
                "vm1",
                stream(&[(0, 80.0), (120, 90.0), (600, 100.0), (720, 70.0)]),
            )
            .with_stream("pm39", stream(&[(100, 0.5), (650, 0.0)]));
        let summary = analyze_patient(&patient, &config()).unwrap();

        assert_eq!(summary.get("nb_msrt_vm1"), Some(4.0));
        assert_eq!(summary.get("nb_strict_missed_vm1"), Some(4.0));
        assert_eq!(summary.get("nb_missed_vm1"), Some(3.0));
        assert_eq!(summary.get("max_inter_vm1"), Some(480.0));
        assert_eq!(summary.get("mean_vm1"), Some(85.0));
        assert_eq!(summary.get("mean_vm1_with_exposure"), Some(95.0));
        assert_eq!(summary.get("mean_vm1_without_exposure"), Some(75.0));
        assert_eq!(summary.get("start_time"), Some(0.0));
        assert_eq!(summary.get("end_time"), Some(720.0));
        assert_eq!(summary.get("length_of_stay_days"), Some(720.0 / 86_400.0));
    }

    #[test]
    fn single_observation_has_count_but_no_gap_statistics() {
        let patient = PatientStreams::new("P2").with_stream("vm1", stream(&[(0, 80.0)]));
        let summary = analyze_patient(&patient, &config()).unwrap();
        assert_eq!(summary.get("nb_msrt_vm1"), Some(1.0));
        assert_eq!(summary.get("mean_inter_vm1"), None);
        assert_eq!(summary.get("nb_missed_vm1"), None);
        assert_eq!(summary.get("mean_vm1"), Some(80.0));
    }

    #[test]
    fn patient_without_data_has_empty_summary() {
        let summary = analyze_patient(&PatientStreams::new("P3"), &config()).unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn missing_period_is_a_config_error() {
        let config = AnalysisConfig {
            missingness_variables: vec!["vm146".to_string()],
            ..config()
        };
        let err = analyze_patient(&PatientStreams::new("P4"), &config).unwrap_err();
        assert!(err.to_string().contains("vm146"));
    }
}
