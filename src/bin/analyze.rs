//! analyze - correlate table rows against a filter row
//!
//! Usage mirrors the positional form `analyze [source [target [filter [filter_column]]]]`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use row_correlation::config::AnalysisConfig;
use row_correlation::error::AnalysisResult;
use row_correlation::pipeline::analyze_file;

/// Correlate every row of a whitespace-delimited table against one filter row
#[derive(Parser)]
#[command(name = "analyze")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input table; the first line is the header
    #[arg(default_value = "stdin.txt")]
    source: PathBuf,

    /// Output path for the analyzed table
    #[arg(default_value = "stdout.txt")]
    target: PathBuf,

    /// Value identifying the filter row; without it no statistics are computed
    filter: Option<String>,

    /// Field position compared against the filter value [default: 1]
    filter_column: Option<usize>,

    /// JSON configuration file; positional arguments override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append run events to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Do not log run events to stderr
    #[arg(short, long)]
    quiet: bool,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    summary: bool,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AnalysisResult<()> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_path(path)?,
        None => AnalysisConfig::default(),
    };
    if cli.filter.is_some() {
        config.filter_value = cli.filter;
    }
    if cli.filter_column.is_some() {
        config.filter_column = cli.filter_column;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file;
    }
    config.quiet |= cli.quiet;
    config.validate()?;

    let summary = analyze_file(&cli.source, &cli.target, &config.to_options())?;
    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
