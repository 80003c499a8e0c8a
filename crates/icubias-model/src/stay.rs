//! Stay extent: first and last anchor observation of a patient.

use chrono::TimeDelta;

use crate::observation::Timestamp;

/// Time span a patient was observed, from the anchor variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayExtent {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl StayExtent {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Length of stay in fractional days.
    pub fn length_days(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / TimeDelta::days(1).num_milliseconds() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn at(seconds: i64) -> Timestamp {
        DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
    }

    #[test]
    fn length_is_in_days() {
        let extent = StayExtent::new(at(0), at(36 * 3600));
        assert!((extent.length_days() - 1.5).abs() < 1e-12);
    }
}
