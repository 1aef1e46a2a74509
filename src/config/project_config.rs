//! Project-level configuration support
//!
//! Loads configuration from `ouispy.toml` or `.ouispyrc.json`, looked up in
//! the directory holding the detection log and then in the working directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # ouispy.toml
//!
//! [report]
//! top_manufacturers = 10
//! high_risk_display_cap = 20
//!
//! [defaults]
//! format = "text"
//! summary_path = "analysis_summary.csv"
//! no_emoji = false
//! ```
//!
//! Proximity bucket thresholds are fixed and cannot be configured.

use crate::analysis::{AnalysisOptions, DEFAULT_TOP_N, HIGH_RISK_DISPLAY_CAP};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Config file names, in lookup order
pub const CONFIG_FILE_NAMES: &[&str] = &["ouispy.toml", ".ouispyrc.json"];

/// Default location of the persisted summary
pub const DEFAULT_SUMMARY_PATH: &str = "analysis_summary.csv";

/// Project configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Report sizing
    #[serde(default)]
    pub report: ReportConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Sizes of the bounded report sections
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Entries in the manufacturer ranking (default: 10)
    #[serde(default)]
    pub top_manufacturers: Option<usize>,

    /// High-risk sightings listed (default: 20)
    #[serde(default)]
    pub high_risk_display_cap: Option<usize>,
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliDefaults {
    /// Default output format (text, json, markdown)
    #[serde(default)]
    pub format: Option<String>,

    /// Where to write the summary CSV
    #[serde(default)]
    pub summary_path: Option<PathBuf>,

    /// Disable emoji by default
    #[serde(default)]
    pub no_emoji: Option<bool>,
}

impl ProjectConfig {
    /// Analysis options with CLI overrides applied on top of this config.
    pub fn analysis_options(&self, top: Option<usize>, high_risk_cap: Option<usize>) -> AnalysisOptions {
        AnalysisOptions {
            top_n: top
                .or(self.report.top_manufacturers)
                .unwrap_or(DEFAULT_TOP_N),
            high_risk_display_cap: high_risk_cap
                .or(self.report.high_risk_display_cap)
                .unwrap_or(HIGH_RISK_DISPLAY_CAP),
        }
    }

    /// Effective output format
    pub fn format(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.defaults.format.clone())
            .unwrap_or_else(|| "text".to_string())
    }

    /// Effective summary path
    pub fn summary_path(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.defaults.summary_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SUMMARY_PATH))
    }

    pub fn no_emoji(&self, cli: bool) -> bool {
        cli || self.defaults.no_emoji.unwrap_or(false)
    }
}

/// Load project configuration for a detection log.
///
/// Searches the log's directory first, then the current directory. The first
/// file that parses wins; broken files are logged and skipped.
pub fn load_project_config(log_path: &Path) -> ProjectConfig {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        dirs.push(parent.to_path_buf());
    }
    dirs.push(PathBuf::from("."));

    for dir in &dirs {
        if let Some(config) = load_from_dir(dir) {
            return config;
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Try each config file name in `dir`.
pub fn load_from_dir(dir: &Path) -> Option<ProjectConfig> {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        let loaded = if name.ends_with(".json") {
            load_json_config(&path)
        } else {
            load_toml_config(&path)
        };
        match loaded {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return Some(config);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }
    None
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::default();
        let options = config.analysis_options(None, None);
        assert_eq!(options.top_n, 10);
        assert_eq!(options.high_risk_display_cap, 20);
        assert_eq!(config.format(None), "text");
        assert_eq!(config.summary_path(None), PathBuf::from("analysis_summary.csv"));
        assert!(!config.no_emoji(false));
    }

    #[test]
    fn test_toml_config_and_cli_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ouispy.toml"),
            r#"
[report]
top_manufacturers = 5

[defaults]
format = "json"
no_emoji = true
"#,
        )
        .unwrap();

        let config = load_from_dir(dir.path()).expect("config loads");
        let options = config.analysis_options(None, None);
        assert_eq!(options.top_n, 5);
        assert_eq!(options.high_risk_display_cap, 20);
        assert_eq!(config.analysis_options(Some(3), Some(7)).top_n, 3);
        assert_eq!(config.format(None), "json");
        assert_eq!(config.format(Some("markdown")), "markdown");
        assert!(config.no_emoji(false));
    }

    #[test]
    fn test_json_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".ouispyrc.json"),
            r#"{"defaults": {"summary_path": "out/summary.csv"}}"#,
        )
        .unwrap();
        let config = load_from_dir(dir.path()).expect("config loads");
        assert_eq!(config.summary_path(None), PathBuf::from("out/summary.csv"));
    }

    #[test]
    fn test_invalid_toml_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ouispy.toml"), "[report\ntop = ").unwrap();
        assert!(load_from_dir(dir.path()).is_none());
    }

    #[test]
    fn test_config_next_to_log_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ouispy.toml"),
            "[report]\nhigh_risk_display_cap = 3\n",
        )
        .unwrap();
        let config = load_project_config(&dir.path().join("detections.csv"));
        assert_eq!(config.analysis_options(None, None).high_risk_display_cap, 3);
    }
}
