//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use icubias_cli::logging::LogFormat;
use icubias_core::PATIENT_ID_COLUMN;
use icubias_stats::{Alternative, TestKind};

#[derive(Parser)]
#[command(
    name = "icubias",
    version,
    about = "Quantify how ICU monitoring intensity differs between patients",
    long_about = "Quantify how ICU monitoring intensity differs between patients.\n\n\
                  `analyze` turns measurement files into one summary row per patient;\n\
                  `compare` runs a statistical test on that summary table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarise every measurement file of a directory, one row per patient.
    Analyze(AnalyzeArgs),

    /// Run one statistical test on a summary table.
    Compare(CompareArgs),

    /// Print the default analysis configuration as TOML.
    Config,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Directory holding the measurement CSV files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// TOML configuration file (default: built-in configuration).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Summary CSV path (default: <DATA_DIR>/output/msrt_stats_patients.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Close exposure windows still open at the end of a stream.
    ///
    /// The window ends at the last observed sample of its indicator. Without
    /// this flag such windows are dropped.
    #[arg(long = "close-open-windows")]
    pub close_open_windows: bool,

    /// Analyse and report without writing the summary file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Summary table produced by `analyze`.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Test to run.
    #[arg(long = "test", value_parser = parse_test_kind)]
    pub test: TestKind,

    /// Tested column.
    #[arg(long = "column", value_name = "COLUMN")]
    pub column: String,

    /// Second column for correlation, regression and chi-square tests.
    #[arg(long = "column2", value_name = "COLUMN")]
    pub column2: Option<String>,

    /// Column whose labels split patients into groups.
    #[arg(long = "group-by", value_name = "COLUMN")]
    pub group_by: Option<String>,

    /// Group labels to compare (default: every label for k-sample tests).
    /// The chi-square test of independence keeps these labels of `--column2`.
    #[arg(long = "groups", value_name = "LABEL", num_args = 1..)]
    pub groups: Vec<String>,

    /// Labels of `--column` kept by the chi-square test of independence.
    #[arg(long = "levels", value_name = "LABEL", num_args = 1..)]
    pub levels: Vec<String>,

    /// Alternative hypothesis.
    #[arg(long = "alternative", value_enum, default_value = "two-sided")]
    pub alternative: AlternativeArg,

    /// Cohort attribute table joined onto the summary by patient id.
    #[arg(long = "cohorts", value_name = "PATH")]
    pub cohorts: Option<PathBuf>,

    /// Patient id column of the cohort table.
    #[arg(long = "cohort-id-column", value_name = "COLUMN", default_value = "SUBJECT_ID")]
    pub cohort_id_column: String,

    /// Patient id column of the summary table.
    #[arg(long = "id-column", value_name = "COLUMN", default_value = PATIENT_ID_COLUMN)]
    pub id_column: String,
}

fn parse_test_kind(value: &str) -> Result<TestKind, String> {
    value.parse().map_err(|err: String| {
        let known: Vec<&str> = TestKind::ALL.into_iter().map(TestKind::as_str).collect();
        format!("{err} (expected one of: {})", known.join(", "))
    })
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AlternativeArg {
    TwoSided,
    Less,
    Greater,
}

impl From<AlternativeArg> for Alternative {
    fn from(value: AlternativeArg) -> Self {
        match value {
            AlternativeArg::TwoSided => Self::TwoSided,
            AlternativeArg::Less => Self::Less,
            AlternativeArg::Greater => Self::Greater,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_takes_several_groups() {
        let cli = Cli::try_parse_from([
            "icubias",
            "compare",
            "summary.csv",
            "--test",
            "Mann-Whitney",
            "--column",
            "nb_msrt_vm1",
            "--group-by",
            "VENTILATED",
            "--groups",
            "yes",
            "no",
            "--alternative",
            "greater",
        ])
        .unwrap();
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.test, TestKind::MannWhitney);
        assert_eq!(args.groups, vec!["yes", "no"]);
        assert_eq!(Alternative::from(args.alternative), Alternative::Greater);
        assert_eq!(args.id_column, PATIENT_ID_COLUMN);
    }

    #[test]
    fn chi_square_filters_both_columns() {
        let cli = Cli::try_parse_from([
            "icubias",
            "compare",
            "summary.csv",
            "--test",
            "chi-square",
            "--column",
            "SEX",
            "--column2",
            "INSURANCE",
            "--levels",
            "F",
            "M",
            "--groups",
            "public",
            "private",
        ])
        .unwrap();
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.levels, vec!["F", "M"]);
        assert_eq!(args.groups, vec!["public", "private"]);
    }

    #[test]
    fn unknown_test_lists_choices() {
        let err = Cli::try_parse_from([
            "icubias", "compare", "t.csv", "--test", "t-test", "--column", "x",
        ])
        .err()
        .unwrap();
        assert!(err.to_string().contains("linregress"));
    }
}
