//! Two-sample Kolmogorov-Smirnov test.

use polars::prelude::DataFrame;

use crate::error::{Result, StatsError};
use crate::options::Alternative;
use crate::sample::group_values;

/// Largest `n1 * n2` for which the exact lattice-path distribution is used.
pub const EXACT_MAX_PRODUCT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KsMethod {
    Exact,
    Asymptotic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsResult {
    /// Largest distance between the empirical CDFs in the tested direction.
    pub statistic: f64,
    pub p_value: f64,
    pub method: KsMethod,
}

/// Compares `var` between two labels of `hue`.
pub fn two_sample_ks(
    df: &DataFrame,
    var: &str,
    hue: &str,
    group1: &str,
    group2: &str,
    alternative: Alternative,
) -> Result<KsResult> {
    let first = group_values(df, var, hue, group1)?;
    let second = group_values(df, var, hue, group2)?;
    ks_2samp(&first, &second, alternative)
}

/// Test on raw samples.
///
/// `Greater` tests whether the first sample's CDF lies above the second's,
/// `Less` the opposite.
pub fn ks_2samp(first: &[f64], second: &[f64], alternative: Alternative) -> Result<KsResult> {
    let n1 = first.len();
    let n2 = second.len();
    if n1 == 0 || n2 == 0 {
        return Err(StatsError::InsufficientData {
            test: "two-sample Kolmogorov-Smirnov",
            unit: "observations per group",
            needed: 1,
            found: 0,
        });
    }
    let mut a = first.to_vec();
    let mut b = second.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    // CDF differences scaled by n1 * n2 stay integral.
    let (mut above, mut below) = (0i64, 0i64);
    for z in a.iter().chain(&b) {
        let c1 = a.partition_point(|v| v <= z) as i64;
        let c2 = b.partition_point(|v| v <= z) as i64;
        let diff = c1 * n2 as i64 - c2 * n1 as i64;
        above = above.max(diff);
        below = below.max(-diff);
    }
    let scaled = match alternative {
        Alternative::TwoSided => above.max(below),
        Alternative::Greater => above,
        Alternative::Less => below,
    };
    let statistic = scaled as f64 / (n1 * n2) as f64;

    if n1 * n2 <= EXACT_MAX_PRODUCT {
        let p_value = exact_p_value(n1, n2, scaled, alternative);
        return Ok(KsResult {
            statistic,
            p_value,
            method: KsMethod::Exact,
        });
    }
    Ok(KsResult {
        statistic,
        p_value: asymptotic_p_value(n1, n2, statistic, alternative),
        method: KsMethod::Asymptotic,
    })
}

/// Share of monotone lattice paths from `(0, 0)` to `(n1, n2)` that reach
/// a scaled distance of at least `scaled`.
fn exact_p_value(n1: usize, n2: usize, scaled: i64, alternative: Alternative) -> f64 {
    if scaled <= 0 {
        return 1.0;
    }
    let inside = |i: usize, j: usize| {
        let diff = i as i64 * n2 as i64 - j as i64 * n1 as i64;
        match alternative {
            Alternative::TwoSided => diff.abs() < scaled,
            Alternative::Greater => diff < scaled,
            Alternative::Less => -diff < scaled,
        }
    };
    // row[j] holds the paths reaching (i - 1, j) until overwritten with (i, j).
    let mut row = vec![0.0f64; n2 + 1];
    for i in 0..=n1 {
        for j in 0..=n2 {
            row[j] = if !inside(i, j) {
                0.0
            } else if i == 0 && j == 0 {
                1.0
            } else {
                let from_left = if j > 0 { row[j - 1] } else { 0.0 };
                row[j] + from_left
            };
        }
    }
    (1.0 - row[n2] / binomial(n1 + n2, n1)).clamp(0.0, 1.0)
}

fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (1..=k).fold(1.0, |acc, i| acc * (n - k + i) as f64 / i as f64)
}

fn asymptotic_p_value(n1: usize, n2: usize, statistic: f64, alternative: Alternative) -> f64 {
    let (m, n) = if n1 >= n2 {
        (n1 as f64, n2 as f64)
    } else {
        (n2 as f64, n1 as f64)
    };
    let p = match alternative {
        Alternative::TwoSided => {
            let en = (m * n / (m + n)).sqrt();
            kolmogorov_sf((en + 0.12 + 0.11 / en) * statistic)
        }
        Alternative::Less | Alternative::Greater => {
            let z = (m * n / (m + n)).sqrt() * statistic;
            let exponent = -2.0 * z * z - 2.0 * z * (m + 2.0 * n) / (m * n * (m + n)).sqrt() / 3.0;
            exponent.exp()
        }
    };
    p.clamp(0.0, 1.0)
}

/// Survival function of the limiting Kolmogorov distribution.
fn kolmogorov_sf(lambda: f64) -> f64 {
    if lambda < 0.2 {
        return 1.0;
    }
    let mut sum = 0.0;
    for k in 1..=100u32 {
        let kf = f64::from(k);
        let term = (-2.0 * kf * kf * lambda * lambda).exp();
        sum += if k % 2 == 1 { term } else { -term };
        if term < 1e-17 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn disjoint_samples() {
        let result = ks_2samp(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], Alternative::TwoSided).unwrap();
        assert_eq!(result.statistic, 1.0);
        assert_close(result.p_value, 0.1);
        assert_eq!(result.method, KsMethod::Exact);

        let greater = ks_2samp(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], Alternative::Greater).unwrap();
        assert_close(greater.p_value, 0.05);
        let less = ks_2samp(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], Alternative::Less).unwrap();
        assert_eq!(less.statistic, 0.0);
        assert_eq!(less.p_value, 1.0);
    }

    #[test]
    fn unequal_sizes_use_exact_paths() {
        let first = [0.1, 0.4, 0.7, 1.5, 2.0];
        let second = [0.3, 0.9, 1.1, 1.8, 2.5, 3.0, 3.3];
        let result = ks_2samp(&first, &second, Alternative::TwoSided).unwrap();
        assert_close(result.statistic, 0.45714285714285713);
        assert_close(result.p_value, 0.43434343434343436);
        let greater = ks_2samp(&first, &second, Alternative::Greater).unwrap();
        assert_close(greater.p_value, 0.21717171717171718);
    }

    #[test]
    fn large_samples_switch_to_asymptotic() {
        let first: Vec<f64> = (0..200).map(f64::from).collect();
        let second: Vec<f64> = (0..200).map(|i| f64::from(i) + 100.0).collect();
        let result = ks_2samp(&first, &second, Alternative::TwoSided).unwrap();
        assert_eq!(result.method, KsMethod::Asymptotic);
        assert_close(result.statistic, 0.5);
        assert!(result.p_value < 1e-10);
    }

    #[test]
    fn kolmogorov_tail_matches_table() {
        // Critical value of the Kolmogorov distribution at the 5% level.
        assert!((kolmogorov_sf(1.3581) - 0.05).abs() < 1e-4);
    }

    #[test]
    fn empty_sample_is_insufficient() {
        assert!(ks_2samp(&[], &[1.0], Alternative::TwoSided).is_err());
    }
}
