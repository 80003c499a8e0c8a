//! Descriptive statistics shared by every aggregator.
//!
//! Quartiles use the nearest-rank estimator: the virtual index
//! `q * (n - 1)` is rounded to the nearest integer (ties to even) and the
//! observed value at that index is returned, never an interpolation between
//! two observations. The median is the conventional midpoint median.

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sorted copy of a sample.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Median of an already sorted sample.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Nearest-rank quantile of an already sorted sample; `q` is clamped to `[0, 1]`.
pub fn nearest_rank_quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let virtual_index = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let idx = (virtual_index.round_ties_even() as usize).min(n - 1);
    Some(sorted[idx])
}

/// Summary of a sample of raw values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSummary {
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarises a sample; `None` when it is empty.
pub fn describe(values: &[f64]) -> Option<ValueSummary> {
    let sorted = sorted(values);
    Some(ValueSummary {
        mean: mean(&sorted)?,
        median: median_sorted(&sorted)?,
        q1: nearest_rank_quantile(&sorted, 0.25)?,
        q3: nearest_rank_quantile(&sorted, 0.75)?,
        min: *sorted.first()?,
        max: *sorted.last()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_use_nearest_rank() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(nearest_rank_quantile(&sorted, 0.25), Some(2.0));
        assert_eq!(nearest_rank_quantile(&sorted, 0.75), Some(3.0));
        assert_eq!(nearest_rank_quantile(&sorted, 0.0), Some(1.0));
        assert_eq!(nearest_rank_quantile(&sorted, 1.0), Some(4.0));
    }

    #[test]
    fn nearest_rank_rounds_ties_to_even() {
        // Virtual index 0.5 rounds to 0, 1.5 rounds to 2.
        assert_eq!(nearest_rank_quantile(&[10.0, 20.0, 30.0], 0.25), Some(10.0));
        assert_eq!(nearest_rank_quantile(&[10.0, 20.0, 30.0], 0.75), Some(30.0));
    }

    #[test]
    fn median_averages_central_pair() {
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn describe_single_value() {
        let summary = describe(&[7.0]).unwrap();
        assert_eq!(summary.mean, 7.0);
        assert_eq!(summary.q1, 7.0);
        assert_eq!(summary.max, 7.0);
    }

    #[test]
    fn describe_empty_is_none() {
        assert_eq!(describe(&[]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn describe_unsorted_sample() {
        let summary = describe(&[4.0, 1.0, 3.0, 2.0, 10.0]).unwrap();
        assert_eq!(summary.mean, 4.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 10.0);
    }
}
