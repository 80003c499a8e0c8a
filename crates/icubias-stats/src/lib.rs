//! Statistical comparison of patient groups over a summary table.
//!
//! Each test has a table-level entry point that extracts its samples from
//! a DataFrame and a raw-sample function working on plain slices.
//! [`run_test`] dispatches a [`TestRequest`] to either kind of test.
//!
//! Missing values are always dropped before a test runs.

pub mod anderson;
pub mod contingency;
pub mod correlation;
pub mod dispatch;
pub mod error;
pub mod kruskal;
pub mod ks;
pub mod mann_whitney;
pub mod options;
pub mod ranks;
pub mod regression;
pub mod sample;

pub use anderson::{AndersonResult, SIGNIFICANCE_LEVELS, anderson_ksamp, k_sample_anderson};
pub use contingency::{
    ChiSquareResult, chi_square_independence, chi_square_subgroups, chi2_contingency,
};
pub use correlation::{CorrelationResult, pearson_r, pearsonr, spearman_r, spearmanr};
pub use dispatch::{TestKind, TestOutcome, TestRequest, run_test};
pub use error::{Result, StatsError};
pub use kruskal::{KruskalResult, k_sample_kruskal, kruskal, two_group_kruskal};
pub use ks::{KsMethod, KsResult, ks_2samp, two_sample_ks};
pub use mann_whitney::{MannWhitneyMethod, MannWhitneyResult, mann_whitney_u, mannwhitneyu};
pub use options::{Alternative, GroupSelection, MissingPolicy};
pub use regression::{RegressionResult, linear_regression, linregress};
pub use sample::{filter_by_label, split_two_groups};
