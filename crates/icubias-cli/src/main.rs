//! `icubias` command-line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use icubias_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command};
use crate::commands::{run_analyze, run_compare, run_config};
use crate::summary::{print_analyze_summary, print_compare_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Analyze(args) => run_analyze(args).map(|result| print_analyze_summary(&result)),
        Command::Compare(args) => run_compare(args).map(|result| print_compare_summary(&result)),
        Command::Config => run_config(),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Flags take precedence over `RUST_LOG`; `--log-level` over `-v`/`-q`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = cli.log_level.map(LevelFilter::from);
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: explicit.unwrap_or_else(|| cli.verbosity.tracing_level_filter()),
        use_env_filter: explicit.is_none() && !cli.verbosity.is_present(),
        format: LogFormat::from(cli.log_format),
        log_file: cli.log_file.clone(),
        with_ansi,
        ..LogConfig::default()
    }
}
