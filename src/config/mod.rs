//! Configuration module
//!
//! This module handles:
//! - Project-level configuration (ouispy.toml / .ouispyrc.json)
//! - Report sizing (ranking length, high-risk display cap)
//! - CLI defaults

mod project_config;

pub use project_config::{
    CliDefaults,
    ProjectConfig,
    ReportConfig,
    CONFIG_FILE_NAMES,
    DEFAULT_SUMMARY_PATH,
    load_from_dir,
    load_project_config,
};
