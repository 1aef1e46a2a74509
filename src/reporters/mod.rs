//! Output reporters for detection log analysis results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors and emoji
//! - `json` - Machine-readable JSON
//! - `markdown` - GitHub-flavored Markdown
//!
//! The grouped summary artifact is written separately by [`summary`].

mod json;
mod markdown;
pub mod summary;
mod text;

use crate::analysis::AnalysisReport;
use crate::models::Relevance;
use anyhow::{anyhow, Result};
use chrono::DateTime;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Presentation switches shared by the human-readable reporters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub emoji: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { emoji: true }
    }
}

/// Render a report in the specified format
pub fn report(report: &AnalysisReport, format: &str, options: RenderOptions) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt, options)
}

/// Render a report using an OutputFormat enum
pub fn report_with_format(
    report: &AnalysisReport,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report, options),
        OutputFormat::Json => json::render(report),
        OutputFormat::Markdown => markdown::render(report, options),
    }
}

/// Marker for a relevance tier
fn relevance_marker(relevance: &str, options: RenderOptions) -> &'static str {
    let tier = Relevance::from_str(relevance).ok();
    match (tier, options.emoji) {
        (Some(Relevance::High), true) => "🔴",
        (Some(Relevance::Medium), true) => "🟡",
        (_, true) => "🟢",
        (Some(Relevance::High), false) => "[H]",
        (Some(Relevance::Medium), false) => "[M]",
        (_, false) => "[L]",
    }
}

/// Log timestamps are milliseconds; render them as UTC.
fn format_timestamp(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}
