//! Summary command - write only the grouped summary CSV

use crate::analysis::export_summary;
use crate::config::load_project_config;
use crate::reporters::summary;

use anyhow::Result;
use console::style;
use std::path::Path;

/// Run the summary command
pub fn run(log: &Path, output: Option<&Path>) -> Result<()> {
    let config = load_project_config(log);
    let table = super::analyze::load_table(log)?;

    let path = config.summary_path(output);
    let rows = export_summary(&table);
    summary::write_summary(&path, &rows)?;

    eprintln!(
        "{} {} groups from {} detections exported to {}",
        style("✓").green(),
        rows.len(),
        table.len(),
        style(path.display()).cyan()
    );
    Ok(())
}
