//! k-sample Anderson-Darling test (Scholz & Stephens, 1987), midrank variant.

use polars::prelude::DataFrame;

use crate::error::{Result, StatsError};
use crate::options::GroupSelection;
use crate::sample::grouped_values;

/// Significance levels matching [`AndersonResult::critical_values`].
pub const SIGNIFICANCE_LEVELS: [f64; 7] = [0.25, 0.1, 0.05, 0.025, 0.01, 0.005, 0.001];

const B0: [f64; 7] = [0.675, 1.281, 1.645, 1.96, 2.326, 2.573, 3.085];
const B1: [f64; 7] = [-0.245, 0.25, 0.678, 1.149, 1.822, 2.364, 3.615];
const B2: [f64; 7] = [-0.105, -0.305, -0.362, -0.396, -0.393, -0.391, -0.373];

#[derive(Debug, Clone, PartialEq)]
pub struct AndersonResult {
    /// Standardised statistic.
    pub statistic: f64,
    pub critical_values: [f64; 7],
    /// Interpolated significance level, clipped to `[0.001, 0.25]`.
    pub significance_level: f64,
    /// Group labels in the order they were compared.
    pub groups: Vec<String>,
}

/// Compares the distribution of `var` across the groups of `hue`.
pub fn k_sample_anderson(
    df: &DataFrame,
    var: &str,
    hue: &str,
    groups: &GroupSelection,
) -> Result<AndersonResult> {
    let grouped = grouped_values(df, var, hue, groups)?;
    let (labels, samples): (Vec<String>, Vec<Vec<f64>>) = grouped.into_iter().unzip();
    let mut result = anderson_ksamp(&samples)?;
    result.groups = labels;
    Ok(result)
}

/// Test on raw samples.
pub fn anderson_ksamp(samples: &[Vec<f64>]) -> Result<AndersonResult> {
    const TEST: &str = "k-sample Anderson-Darling";
    let k = samples.len();
    if k < 2 {
        return Err(StatsError::InsufficientData {
            test: TEST,
            unit: "groups",
            needed: 2,
            found: k,
        });
    }
    if let Some(empty) = samples.iter().position(Vec::is_empty) {
        return Err(StatsError::Degenerate {
            test: TEST,
            reason: format!("group {empty} has no observations"),
        });
    }

    let mut pooled: Vec<f64> = samples.iter().flatten().copied().collect();
    pooled.sort_by(f64::total_cmp);
    let n_total = pooled.len();
    if n_total < 4 {
        return Err(StatsError::InsufficientData {
            test: TEST,
            unit: "observations",
            needed: 4,
            found: n_total,
        });
    }
    let mut distinct = pooled.clone();
    distinct.dedup();
    if distinct.len() < 2 {
        return Err(StatsError::Degenerate {
            test: TEST,
            reason: "all observations are identical".to_string(),
        });
    }

    let a2akn = midrank_statistic(samples, &pooled, &distinct);
    let statistic = standardize(a2akn, samples, n_total);

    let m = (k - 1) as f64;
    let mut critical_values = [0.0; 7];
    for (i, cv) in critical_values.iter_mut().enumerate() {
        *cv = B0[i] + B1[i] / m.sqrt() + B2[i] / m;
    }
    let significance_level = interpolate_significance(statistic, &critical_values);

    Ok(AndersonResult {
        statistic,
        critical_values,
        significance_level,
        groups: Vec::new(),
    })
}

/// `A2akN`, the statistic adjusted for ties.
fn midrank_statistic(samples: &[Vec<f64>], pooled: &[f64], distinct: &[f64]) -> f64 {
    let n = pooled.len() as f64;
    let below = |sorted: &[f64], z: f64| sorted.partition_point(|v| *v < z);
    let at_or_below = |sorted: &[f64], z: f64| sorted.partition_point(|v| *v <= z);

    let tie_counts: Vec<f64> = distinct
        .iter()
        .map(|z| (at_or_below(pooled, *z) - below(pooled, *z)) as f64)
        .collect();
    let midpoints: Vec<f64> = distinct
        .iter()
        .zip(&tie_counts)
        .map(|(z, l)| below(pooled, *z) as f64 + l / 2.0)
        .collect();

    let mut total = 0.0;
    for sample in samples {
        let mut sorted = sample.clone();
        sorted.sort_by(f64::total_cmp);
        let n_i = sorted.len() as f64;
        let mut inner = 0.0;
        for ((z, l), b) in distinct.iter().zip(&tie_counts).zip(&midpoints) {
            let upper = at_or_below(&sorted, *z) as f64;
            let ties = upper - below(&sorted, *z) as f64;
            let m_ij = upper - ties / 2.0;
            inner += l / n * (n * m_ij - b * n_i).powi(2) / (b * (n - b) - n * l / 4.0);
        }
        total += inner / n_i;
    }
    total * (n - 1.0) / n
}

/// Centres and scales the statistic by its exact null mean and variance.
fn standardize(a2akn: f64, samples: &[Vec<f64>], n_total: usize) -> f64 {
    let k = samples.len() as f64;
    let n = n_total as f64;
    let h_big: f64 = samples.iter().map(|s| 1.0 / s.len() as f64).sum();

    // hs[j] = sum of 1/i for i in (N-1-j)..=(N-1)
    let mut hs = Vec::with_capacity(n_total.saturating_sub(2));
    let mut acc = 0.0;
    for i in (2..n_total).rev() {
        acc += 1.0 / i as f64;
        hs.push(acc);
    }
    let h = hs.last().copied().unwrap_or(0.0) + 1.0;
    let g: f64 = hs
        .iter()
        .zip(2..n_total)
        .map(|(c, d)| c / d as f64)
        .sum();

    let a = (4.0 * g - 6.0) * (k - 1.0) + (10.0 - 6.0 * g) * h_big;
    let b = (2.0 * g - 4.0) * k * k + 8.0 * h * k + (2.0 * g - 14.0 * h - 4.0) * h_big - 8.0 * h
        + 4.0 * g
        - 6.0;
    let c = (6.0 * h + 2.0 * g - 2.0) * k * k
        + (4.0 * h - 4.0 * g + 6.0) * k
        + (2.0 * h - 6.0) * h_big
        + 4.0 * h;
    let d = (2.0 * h + 6.0) * k * k - 4.0 * h * k;
    let sigma_sq = (a * n.powi(3) + b * n * n + c * n + d) / ((n - 1.0) * (n - 2.0) * (n - 3.0));
    (a2akn - (k - 1.0)) / sigma_sq.sqrt()
}

/// Quadratic fit of `ln(significance)` against the critical values,
/// evaluated at the statistic and clipped to the tabulated range.
fn interpolate_significance(statistic: f64, critical_values: &[f64; 7]) -> f64 {
    let lowest = critical_values.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = critical_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if statistic < lowest {
        return SIGNIFICANCE_LEVELS[0];
    }
    if statistic > highest {
        return SIGNIFICANCE_LEVELS[6];
    }
    let log_sig: Vec<f64> = SIGNIFICANCE_LEVELS.iter().map(|s| s.ln()).collect();
    let coefficients = quadratic_fit(critical_values, &log_sig);
    let fitted = coefficients[0] * statistic * statistic + coefficients[1] * statistic + coefficients[2];
    fitted.exp().clamp(SIGNIFICANCE_LEVELS[6], SIGNIFICANCE_LEVELS[0])
}

/// Least-squares `[a, b, c]` of `y = a x^2 + b x + c`.
fn quadratic_fit(xs: &[f64], ys: &[f64]) -> [f64; 3] {
    let power_sum = |e: i32| xs.iter().map(|x| x.powi(e)).sum::<f64>();
    let weighted_sum = |e: i32| xs.iter().zip(ys).map(|(x, y)| y * x.powi(e)).sum::<f64>();
    let normal = [
        [power_sum(4), power_sum(3), power_sum(2)],
        [power_sum(3), power_sum(2), power_sum(1)],
        [power_sum(2), power_sum(1), xs.len() as f64],
    ];
    let rhs = [weighted_sum(2), weighted_sum(1), weighted_sum(0)];
    let det = determinant(&normal);
    let mut solution = [0.0; 3];
    for (col, value) in solution.iter_mut().enumerate() {
        let mut replaced = normal;
        for (row, r) in replaced.iter_mut().enumerate() {
            r[col] = rhs[row];
        }
        *value = determinant(&replaced) / det;
    }
    solution
}

fn determinant(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}
