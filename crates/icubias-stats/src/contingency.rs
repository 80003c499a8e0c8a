//! Chi-square test of independence on contingency tables.

use anofox_statistics::categorical::chisq_test;
use polars::prelude::DataFrame;

use crate::error::{Result, StatsError};
use crate::sample::{distinct_labels, labels};

const TEST: &str = "chi-square independence";

#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    /// Expected frequencies under independence, same shape as the observed table.
    pub expected: Vec<Vec<f64>>,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
}

/// Cross-tabulates two categorical columns and tests their independence.
///
/// Rows with a missing label in either column are dropped. `filter1` and
/// `filter2` restrict the labels of `var1` and `var2` before counting.
/// Table rows and columns are sorted by label.
pub fn chi_square_independence(
    df: &DataFrame,
    var1: &str,
    var2: &str,
    filter1: Option<&[String]>,
    filter2: Option<&[String]>,
) -> Result<ChiSquareResult> {
    let first = labels(df, var1)?;
    let second = labels(df, var2)?;
    let keep = |label: &str, filter: Option<&[String]>| {
        filter.is_none_or(|allowed| allowed.iter().any(|a| a == label))
    };
    let pairs: Vec<(String, String)> = first
        .into_iter()
        .zip(second)
        .filter_map(|(a, b)| Some((a?, b?)))
        .filter(|(a, b)| keep(a, filter1) && keep(b, filter2))
        .collect();

    let mut row_labels: Vec<String> = pairs.iter().map(|(a, _)| a.clone()).collect();
    row_labels.sort();
    row_labels.dedup();
    let mut column_labels: Vec<String> = pairs.iter().map(|(_, b)| b.clone()).collect();
    column_labels.sort();
    column_labels.dedup();

    let mut observed = vec![vec![0usize; column_labels.len()]; row_labels.len()];
    for (a, b) in &pairs {
        let (Ok(i), Ok(j)) = (row_labels.binary_search(a), column_labels.binary_search(b)) else {
            continue;
        };
        observed[i][j] += 1;
    }
    chi2_contingency(&observed, row_labels, column_labels)
}

/// Tests whether the categories of `var` are distributed alike in two
/// pre-split groups.
///
/// `categories` defaults to the distinct non-missing labels of `var` in
/// `df`, in order of first appearance.
pub fn chi_square_subgroups(
    df: &DataFrame,
    group1: &DataFrame,
    group2: &DataFrame,
    var: &str,
    categories: Option<&[String]>,
) -> Result<ChiSquareResult> {
    let categories = match categories {
        Some(categories) => categories.to_vec(),
        None => distinct_labels(df, var)?,
    };
    let count = |frame: &DataFrame| -> Result<Vec<usize>> {
        let frame_labels = labels(frame, var)?;
        Ok(categories
            .iter()
            .map(|category| {
                frame_labels
                    .iter()
                    .filter(|label| label.as_deref() == Some(category.as_str()))
                    .count()
            })
            .collect())
    };
    let observed = vec![count(group1)?, count(group2)?];
    chi2_contingency(
        &observed,
        vec!["group1".to_string(), "group2".to_string()],
        categories,
    )
}

/// Pearson chi-square on a table of counts.
///
/// A table with one degree of freedom gets the Yates continuity correction;
/// a table with none yields a statistic of 0 and a p-value of 1.
pub fn chi2_contingency(
    observed: &[Vec<usize>],
    row_labels: Vec<String>,
    column_labels: Vec<String>,
) -> Result<ChiSquareResult> {
    let rows = observed.len();
    let cols = observed.first().map_or(0, Vec::len);
    let total: usize = observed.iter().flatten().sum();
    if rows == 0 || cols == 0 || total == 0 {
        return Err(StatsError::InsufficientData {
            test: TEST,
            unit: "observations",
            needed: 1,
            found: 0,
        });
    }

    let row_sums: Vec<f64> = observed
        .iter()
        .map(|row| row.iter().sum::<usize>() as f64)
        .collect();
    let col_sums: Vec<f64> = (0..cols)
        .map(|j| observed.iter().map(|row| row[j]).sum::<usize>() as f64)
        .collect();
    let expected: Vec<Vec<f64>> = row_sums
        .iter()
        .map(|r| col_sums.iter().map(|c| r * c / total as f64).collect())
        .collect();
    for (i, row) in expected.iter().enumerate() {
        if let Some(j) = row.iter().position(|e| *e == 0.0) {
            return Err(StatsError::ZeroExpected {
                row: row_labels.get(i).cloned().unwrap_or_else(|| i.to_string()),
                column: column_labels.get(j).cloned().unwrap_or_else(|| j.to_string()),
            });
        }
    }

    let degrees_of_freedom = (rows - 1) * (cols - 1);
    let (statistic, p_value) = if degrees_of_freedom == 0 {
        (0.0, 1.0)
    } else {
        let table = observed.to_vec();
        let result =
            chisq_test(&table, degrees_of_freedom == 1).map_err(StatsError::computation(TEST))?;
        (result.statistic, result.p_value)
    };

    Ok(ChiSquareResult {
        statistic,
        p_value,
        degrees_of_freedom,
        expected,
        row_labels,
        column_labels,
    })
}
