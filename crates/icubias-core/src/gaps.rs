//! Inter-measurement gaps and missed-measurement counts.

use chrono::TimeDelta;

use icubias_model::{MissedCount, ObservationStream};

/// Gaps between consecutive observations and the missed counts they imply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapReport {
    pub gaps: Vec<TimeDelta>,
    pub missed: MissedCount,
}

impl GapReport {
    /// Gap lengths in seconds.
    pub fn gap_seconds(&self) -> Vec<f64> {
        self.gaps.iter().map(|gap| seconds(*gap)).collect()
    }
}

pub(crate) fn seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

/// Missed-measurement contribution of a single gap.
///
/// A gap no longer than `expected` is compliant and contributes nothing.
/// Otherwise every whole expected period that fits in the gap counts as
/// strictly missed, and all but the first count as missed after adjustment.
pub fn missed_in_gap(gap: TimeDelta, expected: TimeDelta) -> MissedCount {
    let expected_ms = expected.num_milliseconds();
    if expected_ms <= 0 || gap <= expected {
        return MissedCount::ZERO;
    }
    let slots = (gap.num_milliseconds() / expected_ms) as u64;
    MissedCount::new(slots, slots - 1)
}

/// Computes the gap sequence of a stream against its expected period.
///
/// Streams with fewer than two observations yield no gaps and zero counts;
/// callers treat that as insufficient data, not as a compliant stream.
pub fn detect_gaps(stream: &ObservationStream, expected: TimeDelta) -> GapReport {
    let observations = stream.observations();
    if observations.len() < 2 {
        return GapReport::default();
    }
    let mut report = GapReport {
        gaps: Vec::with_capacity(observations.len() - 1),
        missed: MissedCount::ZERO,
    };
    for pair in observations.windows(2) {
        let gap = pair[1].timestamp - pair[0].timestamp;
        report.missed += missed_in_gap(gap, expected);
        report.gaps.push(gap);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use icubias_model::{Observation, Timestamp};

    fn at(seconds: i64) -> Timestamp {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    fn stream(times: &[i64]) -> ObservationStream {
        times
            .iter()
            .map(|t| Observation::new(at(*t), 1.0))
            .collect()
    }

    #[test]
    fn fewer_than_two_observations_yield_nothing() {
        let expected = TimeDelta::seconds(120);
        assert_eq!(detect_gaps(&stream(&[]), expected), GapReport::default());
        assert_eq!(detect_gaps(&stream(&[5]), expected), GapReport::default());
    }

    #[test]
    fn slightly_late_measurements_count_one_strict_miss_each() {
        let report = detect_gaps(&stream(&[0, 130, 260]), TimeDelta::seconds(120));
        assert_eq!(report.gap_seconds(), vec![130.0, 130.0]);
        assert_eq!(report.missed, MissedCount::new(2, 0));
    }

    #[test]
    fn long_gap_counts_every_missed_slot() {
        let report = detect_gaps(&stream(&[0, 120, 600]), TimeDelta::seconds(120));
        // 120 is compliant, 480 holds four periods.
        assert_eq!(report.missed, MissedCount::new(4, 3));
    }

    #[test]
    fn gap_equal_to_period_is_compliant() {
        assert_eq!(
            missed_in_gap(TimeDelta::seconds(120), TimeDelta::seconds(120)),
            MissedCount::ZERO
        );
    }
}
