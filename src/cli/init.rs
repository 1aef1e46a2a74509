//! Init command - write a project config with the default settings

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# ouispy-analyze configuration
# Placed next to a detection log (or in the working directory).

[report]
# Manufacturers listed in the ranking
top_manufacturers = 10

# High-risk sightings listed in the report (all are counted)
high_risk_display_cap = 20

[defaults]
# Output format: text, json, markdown
format = "text"

# Grouped summary CSV, overwritten on every run
summary_path = "analysis_summary.csv"

# Plain markers instead of emoji
no_emoji = false
"#;

/// Run the init command
pub fn run(dir: &Path, force: bool) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join("ouispy.toml");
    if config_path.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    Ok(())
}
