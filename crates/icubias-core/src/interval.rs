//! Reduction of gaps and raw values into named statistics.
//!
//! Key layout:
//!
//! - gaps: `mean_inter_{var}`, `median_inter_{var}`, `max_inter_{var}`,
//!   `1q_inter_{var}`, `3q_inter_{var}` (seconds), `nb_strict_missed_{var}`,
//!   `nb_missed_{var}`
//! - raw values: `mean_{name}`, `median_{name}`, `q1_{name}`, `q3_{name}`,
//!   `min_{name}`, `max_{name}`, where `name` is the variable, optionally
//!   suffixed with the exposure condition

use chrono::TimeDelta;

use icubias_model::{MissedCount, StatRecord};

use crate::descriptive::{ValueSummary, describe};
use crate::gaps::seconds;

/// Statistics of a gap sequence, or `None` when there is no gap at all.
///
/// The quartiles share the nearest-rank estimator of [`describe`].
pub fn summarize_gaps(gaps: &[TimeDelta], missed: MissedCount, var: &str) -> Option<StatRecord> {
    let in_seconds: Vec<f64> = gaps.iter().map(|gap| seconds(*gap)).collect();
    let summary = describe(&in_seconds)?;
    Some(StatRecord::from([
        (format!("mean_inter_{var}"), summary.mean),
        (format!("median_inter_{var}"), summary.median),
        (format!("max_inter_{var}"), summary.max),
        (format!("1q_inter_{var}"), summary.q1),
        (format!("3q_inter_{var}"), summary.q3),
        (format!("nb_strict_missed_{var}"), missed.strict as f64),
        (format!("nb_missed_{var}"), missed.adjusted as f64),
    ]))
}

/// Classic statistics of raw values, or `None` for an empty sample.
pub fn summarize_values(values: &[f64], name: &str) -> Option<StatRecord> {
    describe(values).map(|summary| value_record(&summary, name))
}

fn value_record(summary: &ValueSummary, name: &str) -> StatRecord {
    StatRecord::from([
        (format!("mean_{name}"), summary.mean),
        (format!("median_{name}"), summary.median),
        (format!("q1_{name}"), summary.q1),
        (format!("q3_{name}"), summary.q3),
        (format!("min_{name}"), summary.min),
        (format!("max_{name}"), summary.max),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_gaps_produce_no_record() {
        assert_eq!(summarize_gaps(&[], MissedCount::ZERO, "vm1"), None);
    }

    #[test]
    fn gap_record_is_in_seconds() {
        let gaps = [
            TimeDelta::seconds(60),
            TimeDelta::seconds(120),
            TimeDelta::seconds(130),
            TimeDelta::seconds(600),
        ];
        let record = summarize_gaps(&gaps, MissedCount::new(6, 4), "vm1").unwrap();
        assert_eq!(record["mean_inter_vm1"], 227.5);
        assert_eq!(record["median_inter_vm1"], 125.0);
        assert_eq!(record["max_inter_vm1"], 600.0);
        assert_eq!(record["1q_inter_vm1"], 120.0);
        assert_eq!(record["3q_inter_vm1"], 130.0);
        assert_eq!(record["nb_strict_missed_vm1"], 6.0);
        assert_eq!(record["nb_missed_vm1"], 4.0);
        assert_eq!(record.len(), 7);
    }

    #[test]
    fn value_record_keys_use_name() {
        let record = summarize_values(&[1.0, 2.0, 3.0, 4.0], "vm5_with_exposure").unwrap();
        assert_eq!(
            record.keys().cloned().collect::<Vec<_>>(),
            vec![
                "max_vm5_with_exposure",
                "mean_vm5_with_exposure",
                "median_vm5_with_exposure",
                "min_vm5_with_exposure",
                "q1_vm5_with_exposure",
                "q3_vm5_with_exposure",
            ]
        );
        assert_eq!(record["q1_vm5_with_exposure"], 2.0);
        assert_eq!(record["median_vm5_with_exposure"], 2.5);
    }

    #[test]
    fn empty_values_produce_no_record() {
        assert_eq!(summarize_values(&[], "vm1"), None);
    }
}
