//! Mann-Whitney U rank-sum test.

use anofox_statistics::nonparametric::wilcoxon::mann_whitney_u as rank_sum_test;
use polars::prelude::DataFrame;

use crate::error::{Result, StatsError};
use crate::options::Alternative;
use crate::ranks::{average_ranks, tie_sizes};
use crate::sample::group_values;

const TEST: &str = "Mann-Whitney U";

/// Samples up to this size (in the smaller group) use the exact null
/// distribution when there are no ties.
pub const EXACT_MAX_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MannWhitneyMethod {
    Exact,
    Asymptotic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitneyResult {
    /// U statistic of the first group.
    pub statistic: f64,
    pub p_value: f64,
    pub method: MannWhitneyMethod,
}

/// Compares `var` between two labels of `hue`.
pub fn mann_whitney_u(
    df: &DataFrame,
    var: &str,
    hue: &str,
    group1: &str,
    group2: &str,
    alternative: Alternative,
) -> Result<MannWhitneyResult> {
    let first = group_values(df, var, hue, group1)?;
    let second = group_values(df, var, hue, group2)?;
    mannwhitneyu(&first, &second, alternative)
}

/// Test on raw samples. `Greater` means the first sample tends to be larger.
///
/// Tied or larger samples go through the tie-corrected normal approximation
/// with continuity correction; a pooled sample of one repeated value carries
/// no evidence and gets a p-value of 1.
pub fn mannwhitneyu(first: &[f64], second: &[f64], alternative: Alternative) -> Result<MannWhitneyResult> {
    let n1 = first.len();
    let n2 = second.len();
    if n1 == 0 || n2 == 0 {
        return Err(StatsError::InsufficientData {
            test: TEST,
            unit: "observations per group",
            needed: 1,
            found: 0,
        });
    }
    let pooled: Vec<f64> = first.iter().chain(second).copied().collect();
    let ties = tie_sizes(&pooled);
    let (n1f, n2f) = (n1 as f64, n2 as f64);

    if ties.len() == 1 {
        return Ok(MannWhitneyResult {
            statistic: n1f * n2f / 2.0,
            p_value: 1.0,
            method: MannWhitneyMethod::Asymptotic,
        });
    }

    if ties.len() < pooled.len() || n1.min(n2) > EXACT_MAX_SIZE {
        let result = rank_sum_test(
            first,
            second,
            alternative.into(),
            true,
            false,
            None,
            None,
        )
        .map_err(StatsError::computation(TEST))?;
        return Ok(MannWhitneyResult {
            statistic: result.statistic,
            p_value: result.p_value.clamp(0.0, 1.0),
            method: MannWhitneyMethod::Asymptotic,
        });
    }

    let rank_sum: f64 = average_ranks(&pooled)[..n1].iter().sum();
    let u1 = rank_sum - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;
    let p_value = match alternative {
        Alternative::Greater => exact_sf(n1, n2, u1),
        Alternative::Less => exact_sf(n1, n2, u2),
        Alternative::TwoSided => 2.0 * exact_sf(n1, n2, u1.max(u2)),
    };
    Ok(MannWhitneyResult {
        statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
        method: MannWhitneyMethod::Exact,
    })
}

/// `P(U >= u)` under the null, from the Gaussian binomial coefficients.
fn exact_sf(n1: usize, n2: usize, u: f64) -> f64 {
    let (m, n) = (n1.min(n2), n1.max(n2));
    // Coefficient c of q^k counts the arrangements with U == k.
    let mut counts = vec![0.0f64; m * n + m + 1];
    counts[0] = 1.0;
    let mut degree = 0;
    for i in 1..=m {
        let shift = n + i;
        for k in (shift..=degree + shift).rev() {
            counts[k] -= counts[k - shift];
        }
        for k in i..=degree + shift {
            counts[k] += counts[k - i];
        }
        degree = i * n;
    }
    let total: f64 = counts[..=m * n].iter().sum();
    let from = u.ceil().max(0.0) as usize;
    if from > m * n {
        return 0.0;
    }
    counts[from..=m * n].iter().sum::<f64>() / total
}
