use std::path::PathBuf;

use icubias_core::FileReport;
use icubias_stats::{TestKind, TestOutcome, TestRequest};

/// Outcome of the `analyze` command.
#[derive(Debug)]
pub struct AnalyzeResult {
    pub files: Vec<FileReport>,
    pub patient_count: usize,
    /// Statistic columns, patient id excluded.
    pub column_count: usize,
    pub unresolved_cells: usize,
    /// `None` on a dry run.
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct CompareResult {
    pub test: TestKind,
    pub request: TestRequest,
    pub outcome: TestOutcome,
}
