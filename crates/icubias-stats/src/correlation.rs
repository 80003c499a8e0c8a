//! Pearson and Spearman correlation with Student-t p-values.

use anofox_statistics::correlation::pearson;
use polars::prelude::DataFrame;

use crate::error::{Result, StatsError};
use crate::options::Alternative;
use crate::ranks::average_ranks;
use crate::sample::paired_values;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationResult {
    pub coefficient: f64,
    pub p_value: f64,
    /// Complete pairs used.
    pub pairs: usize,
}

/// Spearman rank correlation between two columns.
pub fn spearman_r(
    df: &DataFrame,
    var1: &str,
    var2: &str,
    alternative: Alternative,
) -> Result<CorrelationResult> {
    let (x, y) = unzip(paired_values(df, var1, var2)?);
    spearmanr(&x, &y, alternative)
}

/// Pearson correlation between two columns.
pub fn pearson_r(
    df: &DataFrame,
    var1: &str,
    var2: &str,
    alternative: Alternative,
) -> Result<CorrelationResult> {
    let (x, y) = unzip(paired_values(df, var1, var2)?);
    pearsonr(&x, &y, alternative)
}

fn unzip(pairs: Vec<(f64, f64)>) -> (Vec<f64>, Vec<f64>) {
    pairs.into_iter().unzip()
}

/// Pearson correlation of the average ranks, so ties are handled and the
/// p-value uses the t approximation at every sample size.
pub fn spearmanr(x: &[f64], y: &[f64], alternative: Alternative) -> Result<CorrelationResult> {
    correlate("Spearman correlation", &average_ranks(x), &average_ranks(y), alternative)
}

pub fn pearsonr(x: &[f64], y: &[f64], alternative: Alternative) -> Result<CorrelationResult> {
    correlate("Pearson correlation", x, y, alternative)
}

fn correlate(
    test: &'static str,
    x: &[f64],
    y: &[f64],
    alternative: Alternative,
) -> Result<CorrelationResult> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(StatsError::InsufficientData {
            test,
            unit: "pairs",
            needed: 2,
            found: n,
        });
    }
    let (x, y) = (x[..n].to_vec(), y[..n].to_vec());
    if is_constant(&x) || is_constant(&y) {
        return Err(StatsError::Degenerate {
            test,
            reason: "one of the inputs is constant".to_string(),
        });
    }
    if n == 2 {
        // Two distinct points always lie on a line.
        let coefficient = ((x[1] - x[0]) * (y[1] - y[0])).signum();
        return Ok(CorrelationResult {
            coefficient,
            p_value: 1.0,
            pairs: n,
        });
    }

    let result = pearson(&x, &y, None).map_err(StatsError::computation(test))?;
    let coefficient = result.estimate.clamp(-1.0, 1.0);
    Ok(CorrelationResult {
        coefficient,
        p_value: alternative.from_two_sided(result.p_value, coefficient),
        pairs: n,
    })
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|value| *value == values[0])
}
