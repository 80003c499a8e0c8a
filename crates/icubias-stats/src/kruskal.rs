//! Kruskal-Wallis H test.

use anofox_statistics::nonparametric::kruskal::kruskal_wallis;
use polars::prelude::DataFrame;

use crate::error::{Result, StatsError};
use crate::options::GroupSelection;
use crate::sample::{column_values, grouped_values};

const TEST: &str = "Kruskal-Wallis";

#[derive(Debug, Clone, PartialEq)]
pub struct KruskalResult {
    /// Tie-corrected H statistic.
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
}

/// Compares `var` across the groups of `hue`.
pub fn k_sample_kruskal(
    df: &DataFrame,
    var: &str,
    hue: &str,
    groups: &GroupSelection,
) -> Result<KruskalResult> {
    let samples: Vec<Vec<f64>> = grouped_values(df, var, hue, groups)?
        .into_iter()
        .map(|(_, values)| values)
        .collect();
    kruskal(&samples)
}

/// Compares `var` between two pre-split tables.
pub fn two_group_kruskal(
    group1: &DataFrame,
    group2: &DataFrame,
    var: &str,
) -> Result<KruskalResult> {
    let first = column_values(group1, var)?;
    let second = column_values(group2, var)?;
    kruskal(&[first, second])
}

/// Test on raw samples.
pub fn kruskal(samples: &[Vec<f64>]) -> Result<KruskalResult> {
    if samples.len() < 2 {
        return Err(StatsError::InsufficientData {
            test: TEST,
            unit: "groups",
            needed: 2,
            found: samples.len(),
        });
    }
    if let Some(empty) = samples.iter().position(Vec::is_empty) {
        return Err(StatsError::Degenerate {
            test: TEST,
            reason: format!("group {empty} has no observations"),
        });
    }

    let mut pooled = samples.iter().flatten();
    if let Some(first) = pooled.next()
        && pooled.all(|value| value == first)
    {
        return Err(StatsError::Degenerate {
            test: TEST,
            reason: "all observations are identical".to_string(),
        });
    }

    let group_refs: Vec<&[f64]> = samples.iter().map(Vec::as_slice).collect();
    let result = kruskal_wallis(&group_refs).map_err(StatsError::computation(TEST))?;
    Ok(KruskalResult {
        statistic: result.statistic,
        p_value: result.p_value,
        degrees_of_freedom: samples.len() - 1,
    })
}
