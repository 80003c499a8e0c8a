//! Extraction of samples from a summary table.
//!
//! Labels are compared on their string rendering, so a boolean grouping
//! column is addressed with `true`/`false` and an integer one with its
//! decimal digits. Missing values and missing labels are dropped.

use polars::prelude::{BooleanChunked, DataFrame};

use icubias_common::{column_f64_values, column_labels};

use crate::error::{Result, StatsError};
use crate::options::GroupSelection;

fn require_column(df: &DataFrame, column: &str) -> Result<()> {
    if df.column(column).is_err() {
        return Err(StatsError::ColumnNotFound {
            column: column.to_string(),
        });
    }
    Ok(())
}

/// Float values of a column with at least one non-missing value.
fn numeric_column(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    require_column(df, column)?;
    let values = column_f64_values(df, column)?;
    if values.iter().all(Option::is_none) {
        return Err(StatsError::EmptyColumn {
            column: column.to_string(),
        });
    }
    Ok(values)
}

/// Float values of a column, missing values removed.
pub fn column_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    Ok(numeric_column(df, column)?.into_iter().flatten().collect())
}

/// Labels of a column with missing cells kept as `None`.
pub fn labels(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    require_column(df, column)?;
    Ok(column_labels(df, column)?)
}

/// Distinct non-missing labels in order of first appearance.
pub fn distinct_labels(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let mut seen = Vec::new();
    for label in labels(df, column)?.into_iter().flatten() {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    Ok(seen)
}

/// Values of `var` for each selected label of `hue`.
///
/// With [`GroupSelection::All`] the groups are the labels that carry at
/// least one value. A label named in [`GroupSelection::Only`] without any
/// value is a [`StatsError::GroupNotFound`].
pub fn grouped_values(
    df: &DataFrame,
    var: &str,
    hue: &str,
    selection: &GroupSelection,
) -> Result<Vec<(String, Vec<f64>)>> {
    let values = numeric_column(df, var)?;
    let hue_labels = labels(df, hue)?;

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (label, value) in hue_labels.into_iter().zip(values) {
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };
        match groups.iter_mut().find(|(name, _)| *name == label) {
            Some((_, bucket)) => bucket.push(value),
            None => groups.push((label, vec![value])),
        }
    }

    match selection {
        GroupSelection::All => Ok(groups),
        GroupSelection::Only(wanted) => wanted
            .iter()
            .map(|name| {
                groups
                    .iter()
                    .find(|(label, _)| label == name)
                    .cloned()
                    .ok_or_else(|| StatsError::GroupNotFound {
                        group: name.clone(),
                        column: hue.to_string(),
                    })
            })
            .collect(),
    }
}

/// Values of `var` for one label of `hue`.
pub fn group_values(df: &DataFrame, var: &str, hue: &str, group: &str) -> Result<Vec<f64>> {
    let selection = GroupSelection::Only(vec![group.to_string()]);
    let mut groups = grouped_values(df, var, hue, &selection)?;
    Ok(groups.pop().map(|(_, values)| values).unwrap_or_default())
}

/// Rows where both columns hold a value.
pub fn paired_values(df: &DataFrame, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    let xs = numeric_column(df, x)?;
    let ys = numeric_column(df, y)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect())
}

/// Rows of `df` whose `column` label equals `label`.
pub fn filter_by_label(df: &DataFrame, column: &str, label: &str) -> Result<DataFrame> {
    let mask: BooleanChunked = labels(df, column)?
        .into_iter()
        .map(|value| Some(value.as_deref() == Some(label)))
        .collect();
    Ok(df.filter(&mask)?)
}

/// Rows of `df` labelled `group1` and rows labelled `group2` in `hue`.
///
/// Each label must occur in `hue`, otherwise the split fails with
/// [`StatsError::GroupNotFound`] instead of producing an empty frame.
pub fn split_two_groups(
    df: &DataFrame,
    hue: &str,
    group1: &str,
    group2: &str,
) -> Result<(DataFrame, DataFrame)> {
    let present = distinct_labels(df, hue)?;
    for group in [group1, group2] {
        if !present.iter().any(|label| label == group) {
            return Err(StatsError::GroupNotFound {
                group: group.to_string(),
                column: hue.to_string(),
            });
        }
    }
    Ok((
        filter_by_label(df, hue, group1)?,
        filter_by_label(df, hue, group2)?,
    ))
}
