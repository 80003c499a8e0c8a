//! Uniform entry point over every comparison test.

use std::fmt;
use std::str::FromStr;

use polars::prelude::DataFrame;
use tracing::debug;

use crate::anderson::{AndersonResult, SIGNIFICANCE_LEVELS, k_sample_anderson};
use crate::contingency::{ChiSquareResult, chi_square_independence, chi_square_subgroups};
use crate::correlation::{CorrelationResult, pearson_r, spearman_r};
use crate::error::{Result, StatsError};
use crate::kruskal::{KruskalResult, k_sample_kruskal, two_group_kruskal};
use crate::ks::{KsResult, two_sample_ks};
use crate::mann_whitney::{MannWhitneyResult, mann_whitney_u};
use crate::options::{Alternative, GroupSelection, MissingPolicy};
use crate::regression::{RegressionResult, linear_regression};
use crate::sample::split_two_groups;

/// Test to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    Anderson,
    KolmogorovSmirnov,
    MannWhitney,
    Kruskal,
    ChiSquare,
    ChiSquareSubgroups,
    Spearman,
    Pearson,
    LinearRegression,
}

impl TestKind {
    pub const ALL: [TestKind; 9] = [
        Self::Anderson,
        Self::KolmogorovSmirnov,
        Self::MannWhitney,
        Self::Kruskal,
        Self::ChiSquare,
        Self::ChiSquareSubgroups,
        Self::Spearman,
        Self::Pearson,
        Self::LinearRegression,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anderson => "anderson",
            Self::KolmogorovSmirnov => "ks",
            Self::MannWhitney => "mann-whitney",
            Self::Kruskal => "kruskal",
            Self::ChiSquare => "chi-square",
            Self::ChiSquareSubgroups => "chi-square-subgroups",
            Self::Spearman => "spearman",
            Self::Pearson => "pearson",
            Self::LinearRegression => "linregress",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown test '{s}'"))
    }
}

/// One comparison over a table.
///
/// `column` is the tested variable; `column2` the second variable of
/// correlation, regression (as `y`) and chi-square tests. Group tests split
/// rows by `group_by`, restricted to `groups` when non-empty; two-group
/// tests need exactly two labels in `groups`. The chi-square test of
/// independence keeps only `levels` of `column` and `groups` of `column2`
/// when either is non-empty.
#[derive(Debug, Clone, Default)]
pub struct TestRequest {
    pub column: String,
    pub column2: Option<String>,
    pub group_by: Option<String>,
    pub groups: Vec<String>,
    pub levels: Vec<String>,
    pub alternative: Alternative,
    pub missing: MissingPolicy,
}

impl TestRequest {
    fn second_column(&self, kind: TestKind) -> Result<&str> {
        self.column2
            .as_deref()
            .ok_or_else(|| missing(kind, "a second column"))
    }

    fn hue(&self, kind: TestKind) -> Result<&str> {
        self.group_by
            .as_deref()
            .ok_or_else(|| missing(kind, "a grouping column"))
    }

    fn two_groups(&self, kind: TestKind) -> Result<(&str, &str)> {
        match self.groups.as_slice() {
            [first, second] => Ok((first, second)),
            other => Err(StatsError::InsufficientData {
                test: kind.as_str(),
                unit: "named groups",
                needed: 2,
                found: other.len(),
            }),
        }
    }
}

fn missing(kind: TestKind, argument: &'static str) -> StatsError {
    StatsError::MissingArgument {
        test: kind.as_str(),
        argument,
    }
}

/// Result of any test.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    Anderson(AndersonResult),
    KolmogorovSmirnov(KsResult),
    MannWhitney(MannWhitneyResult),
    Kruskal(KruskalResult),
    ChiSquare(ChiSquareResult),
    Correlation(CorrelationResult),
    Regression(RegressionResult),
}

impl TestOutcome {
    pub fn p_value(&self) -> f64 {
        match self {
            Self::Anderson(r) => r.significance_level,
            Self::KolmogorovSmirnov(r) => r.p_value,
            Self::MannWhitney(r) => r.p_value,
            Self::Kruskal(r) => r.p_value,
            Self::ChiSquare(r) => r.p_value,
            Self::Correlation(r) => r.p_value,
            Self::Regression(r) => r.p_value,
        }
    }

    /// Named values for display, in a stable order.
    pub fn fields(&self) -> Vec<(String, String)> {
        let num = |v: f64| format!("{v:.6}");
        let field = |name: &str, value: String| (name.to_string(), value);
        match self {
            Self::Anderson(r) => {
                let mut fields = vec![
                    field("groups", r.groups.join(", ")),
                    field("statistic", num(r.statistic)),
                    field("significance_level", num(r.significance_level)),
                ];
                for (level, cv) in SIGNIFICANCE_LEVELS.iter().zip(r.critical_values) {
                    fields.push(field(&format!("critical_{level}"), num(cv)));
                }
                fields
            }
            Self::KolmogorovSmirnov(r) => vec![
                field("statistic", num(r.statistic)),
                field("p_value", num(r.p_value)),
                field("method", format!("{:?}", r.method).to_lowercase()),
            ],
            Self::MannWhitney(r) => vec![
                field("statistic", num(r.statistic)),
                field("p_value", num(r.p_value)),
                field("method", format!("{:?}", r.method).to_lowercase()),
            ],
            Self::Kruskal(r) => vec![
                field("statistic", num(r.statistic)),
                field("p_value", num(r.p_value)),
                field("dof", r.degrees_of_freedom.to_string()),
            ],
            Self::ChiSquare(r) => vec![
                field("statistic", num(r.statistic)),
                field("p_value", num(r.p_value)),
                field("dof", r.degrees_of_freedom.to_string()),
                field("rows", r.row_labels.join(", ")),
                field("columns", r.column_labels.join(", ")),
            ],
            Self::Correlation(r) => vec![
                field("coefficient", num(r.coefficient)),
                field("p_value", num(r.p_value)),
                field("pairs", r.pairs.to_string()),
            ],
            Self::Regression(r) => vec![
                field("slope", num(r.slope)),
                field("intercept", num(r.intercept)),
                field("r_value", num(r.r_value)),
                field("p_value", num(r.p_value)),
                field("slope_stderr", num(r.slope_stderr)),
                field("intercept_stderr", num(r.intercept_stderr)),
            ],
        }
    }
}

/// Runs one test. The table is never modified.
pub fn run_test(df: &DataFrame, kind: TestKind, request: &TestRequest) -> Result<TestOutcome> {
    debug!(test = %kind, column = %request.column, "running comparison");
    let var = request.column.as_str();
    let selection = GroupSelection::from_labels(&request.groups);
    match kind {
        TestKind::Anderson => {
            k_sample_anderson(df, var, request.hue(kind)?, &selection).map(TestOutcome::Anderson)
        }
        TestKind::KolmogorovSmirnov => {
            let (g1, g2) = request.two_groups(kind)?;
            two_sample_ks(df, var, request.hue(kind)?, g1, g2, request.alternative)
                .map(TestOutcome::KolmogorovSmirnov)
        }
        TestKind::MannWhitney => {
            let (g1, g2) = request.two_groups(kind)?;
            mann_whitney_u(df, var, request.hue(kind)?, g1, g2, request.alternative)
                .map(TestOutcome::MannWhitney)
        }
        TestKind::Kruskal => {
            let hue = request.hue(kind)?;
            if let [g1, g2] = request.groups.as_slice() {
                let (first, second) = split_two_groups(df, hue, g1, g2)?;
                two_group_kruskal(&first, &second, var).map(TestOutcome::Kruskal)
            } else {
                k_sample_kruskal(df, var, hue, &selection).map(TestOutcome::Kruskal)
            }
        }
        TestKind::ChiSquare => {
            fn restrict(labels: &[String]) -> Option<&[String]> {
                (!labels.is_empty()).then_some(labels)
            }
            chi_square_independence(
                df,
                var,
                request.second_column(kind)?,
                restrict(&request.levels),
                restrict(&request.groups),
            )
            .map(TestOutcome::ChiSquare)
        }
        TestKind::ChiSquareSubgroups => {
            let hue = request.hue(kind)?;
            let (g1, g2) = request.two_groups(kind)?;
            let (first, second) = split_two_groups(df, hue, g1, g2)?;
            chi_square_subgroups(df, &first, &second, var, None).map(TestOutcome::ChiSquare)
        }
        TestKind::Spearman => spearman_r(df, var, request.second_column(kind)?, request.alternative)
            .map(TestOutcome::Correlation),
        TestKind::Pearson => pearson_r(df, var, request.second_column(kind)?, request.alternative)
            .map(TestOutcome::Correlation),
        TestKind::LinearRegression => {
            linear_regression(df, var, request.second_column(kind)?, request.alternative)
                .map(TestOutcome::Regression)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("value".into(), &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0]).into_column(),
            Series::new("ventilated".into(), &[true, true, true, false, false, false])
                .into_column(),
        ])
        .unwrap()
    }

    fn request(groups: &[&str]) -> TestRequest {
        TestRequest {
            column: "value".to_string(),
            group_by: Some("ventilated".to_string()),
            groups: groups.iter().map(|g| (*g).to_string()).collect(),
            ..TestRequest::default()
        }
    }

    #[test]
    fn rank_tests_separate_single_valued_groups() {
        let df = frame();
        let mw = run_test(&df, TestKind::MannWhitney, &request(&["true", "false"])).unwrap();
        assert!(mw.p_value() < 0.05);
        let kw = run_test(&df, TestKind::Kruskal, &request(&["true", "false"])).unwrap();
        assert!(kw.p_value() < 0.05);
        let kw_all = run_test(&df, TestKind::Kruskal, &request(&[])).unwrap();
        assert_eq!(kw, kw_all);
    }

    #[test]
    fn two_group_tests_need_two_labels() {
        let err = run_test(&frame(), TestKind::MannWhitney, &request(&["true"])).unwrap_err();
        assert!(matches!(err, StatsError::InsufficientData { found: 1, .. }));
    }

    #[test]
    fn missing_second_column_is_reported() {
        let err = run_test(&frame(), TestKind::Pearson, &request(&[])).unwrap_err();
        assert_eq!(err.to_string(), "pearson requires a second column");
    }

    #[test]
    fn kinds_parse_from_their_names() {
        for kind in TestKind::ALL {
            assert_eq!(kind.as_str().parse::<TestKind>(), Ok(kind));
        }
        assert!("t-test".parse::<TestKind>().is_err());
    }

    #[test]
    fn kruskal_fields_render() {
        let outcome = run_test(&frame(), TestKind::Kruskal, &request(&[])).unwrap();
        let rendered = outcome
            .fields()
            .into_iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(rendered, @r"
        statistic: 5.000000
        p_value: 0.025347
        dof: 1
        ");
    }
}
