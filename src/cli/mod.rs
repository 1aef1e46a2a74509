//! CLI command definitions and handlers

pub(crate) mod analyze;
mod init;
mod summary;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a count that must be at least 1
fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// ouispy-analyze - statistics for surveillance-device detection logs
#[derive(Parser, Debug)]
#[command(name = "ouispy-analyze")]
#[command(
    version,
    about = "Analyze BLE/WiFi surveillance-device detection logs",
    long_about = "Reads the detections CSV written by the scanning appliance and reports \
category, relevance, manufacturer, deployment and type breakdowns, RSSI statistics \
with proximity buckets, and every HIGH relevance sighting. A grouped summary \
(manufacturer x category x relevance) is written to analysis_summary.csv.\n\n\
Run without a subcommand to analyze a log:\n  \
ouispy-analyze detections.csv",
    args_conflicts_with_subcommands = true,
    after_help = "\
Examples:
  ouispy-analyze detections.csv                     Terminal report + analysis_summary.csv
  ouispy-analyze analyze detections.csv -f json     JSON report for scripting
  ouispy-analyze analyze detections.csv -f md -o report.md
  ouispy-analyze summary detections.csv -o out.csv  Only write the grouped summary
  ouispy-analyze init                               Create an ouispy.toml"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options for producing the full report
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Detection log (CSV)
    #[arg(value_name = "LOG")]
    pub log: Option<PathBuf>,

    /// Output format: text, json, markdown (or md)
    #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md"])]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Number of manufacturers in the ranking (default: 10)
    #[arg(long, value_parser = parse_positive)]
    pub top: Option<usize>,

    /// High-risk sightings to list (default: 20)
    #[arg(long, value_parser = parse_positive)]
    pub high_risk_cap: Option<usize>,

    /// Summary CSV path (default: analysis_summary.csv)
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Do not write the summary CSV
    #[arg(long, conflicts_with = "summary")]
    pub no_summary: bool,

    /// Disable emoji in output (cleaner for logs)
    #[arg(long)]
    pub no_emoji: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Produce the full report (the default when no subcommand is given)
    Analyze(AnalyzeArgs),

    /// Only write the grouped summary CSV
    Summary {
        /// Detection log (CSV)
        #[arg(value_name = "LOG")]
        log: PathBuf,

        /// Summary CSV path (default: analysis_summary.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write an ouispy.toml with the default settings
    Init {
        /// Directory to create the config in
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing ouispy.toml
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Analyze(args)) => analyze::run(&args),
        Some(Commands::Summary { log, output }) => summary::run(&log, output.as_deref()),
        Some(Commands::Init { dir, force }) => init::run(&dir, force),
        None => analyze::run(&cli.analyze),
    }
}
