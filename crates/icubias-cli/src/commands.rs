use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use icubias_cli::tables::{
    attach_cohorts, default_output_path, read_summary_table, write_summary_csv,
};
use icubias_core::analyze_files;
use icubias_ingest::{list_data_files, load_config, read_cohort_table};
use icubias_model::AnalysisConfig;
use icubias_stats::{TestRequest, run_test};

use crate::cli::{AnalyzeArgs, CompareArgs};
use crate::types::{AnalyzeResult, CompareResult};

pub fn run_config() -> Result<()> {
    let rendered = AnalysisConfig::default()
        .to_toml_string()
        .context("render default configuration")?;
    print!("{rendered}");
    Ok(())
}

fn effective_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("load configuration {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if args.close_open_windows {
        config.close_open_windows_at_stream_end = true;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeResult> {
    let span = info_span!("analyze", data_dir = %args.data_dir.display());
    let _guard = span.enter();

    let config = effective_config(args)?;
    let files = list_data_files(&args.data_dir)
        .with_context(|| format!("list data files in {}", args.data_dir.display()))?;
    if files.is_empty() {
        bail!("no CSV files found in {}", args.data_dir.display());
    }

    let start = Instant::now();
    let outcome = analyze_files(&files, &config)?;
    let unresolved_cells = outcome.table.unresolved_count();
    if unresolved_cells > 0 {
        warn!(
            unresolved_cells,
            "patients split across files disagree on some statistics"
        );
    }
    for report in &outcome.files {
        if !report.missing_variables.is_empty() {
            warn!(
                path = %report.path.display(),
                missing = ?report.missing_variables,
                "configured variables absent from file"
            );
        }
    }
    info!(
        file_count = files.len(),
        patient_count = outcome.table.len(),
        duration_ms = start.elapsed().as_millis(),
        "analysis complete"
    );

    let mut df = outcome.table.to_dataframe()?;
    let output = if args.dry_run {
        None
    } else {
        let path: PathBuf = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.data_dir));
        write_summary_csv(&mut df, &path)?;
        Some(path)
    };

    Ok(AnalyzeResult {
        files: outcome.files,
        patient_count: outcome.table.len(),
        column_count: df.width().saturating_sub(1),
        unresolved_cells,
        output,
    })
}

pub fn run_compare(args: &CompareArgs) -> Result<CompareResult> {
    let span = info_span!("compare", test = %args.test, column = %args.column);
    let _guard = span.enter();

    let mut df = read_summary_table(&args.table)?;
    if let Some(path) = &args.cohorts {
        let cohorts = read_cohort_table(path, &args.cohort_id_column)
            .with_context(|| format!("read cohort table {}", path.display()))?;
        df = attach_cohorts(&df, &cohorts, &args.id_column)?;
    }

    let request = TestRequest {
        column: args.column.clone(),
        column2: args.column2.clone(),
        group_by: args.group_by.clone(),
        groups: args.groups.clone(),
        levels: args.levels.clone(),
        alternative: args.alternative.into(),
        ..TestRequest::default()
    };
    let outcome = run_test(&df, args.test, &request)
        .with_context(|| format!("{} test on '{}'", args.test, args.column))?;
    info!(p_value = outcome.p_value(), "comparison complete");
    Ok(CompareResult {
        test: args.test,
        request,
        outcome,
    })
}
