//! Analyze command implementation
//!
//! 1. Load project config (next to the log, then the working directory)
//! 2. Read the detection log into a record table
//! 3. Build the analysis report
//! 4. Render it (text, json, markdown) to stdout or a file
//! 5. Write the grouped summary CSV

use super::AnalyzeArgs;
use crate::analysis::{export_summary, AnalysisReport};
use crate::config::load_project_config;
use crate::ingest;
use crate::reporters::{self, summary, RenderOptions};

use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Run the analyze command
pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let Some(log) = args.log.as_deref() else {
        anyhow::bail!("Usage: ouispy-analyze <detections.csv>  (see --help)");
    };
    let start = Instant::now();

    let config = load_project_config(log);
    let table = load_table(log)?;

    let options = config.analysis_options(args.top, args.high_risk_cap);
    let report = AnalysisReport::build(&table, &options).context("Analysis failed")?;

    let format = config.format(args.format.as_deref());
    let render = RenderOptions {
        emoji: !config.no_emoji(args.no_emoji),
    };
    let rendered = reporters::report(&report, &format, render)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => print!("{}", rendered),
    }

    if !args.no_summary {
        let summary_path = config.summary_path(args.summary.as_deref());
        let rows = export_summary(&table);
        summary::write_summary(&summary_path, &rows)?;
        eprintln!(
            "{} Summary exported to {}",
            style("✓").green(),
            style(summary_path.display()).cyan()
        );
    }

    info!(
        "Analyzed {} detections in {:.2?}",
        table.len(),
        start.elapsed()
    );
    Ok(())
}

/// Read the log, turning ingestion errors into a readable chain
pub(crate) fn load_table(log: &Path) -> Result<crate::models::RecordTable> {
    if !log.exists() {
        anyhow::bail!("File '{}' not found", log.display());
    }
    ingest::read_detections(log)
        .with_context(|| format!("Failed to load detections from {}", log.display()))
}
