//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Incident notes and field reports
//! - Pull request comments on survey datasets
//! - Wikis
//!
//! No wall-clock time is embedded, so the same log always renders the same
//! document.

use super::{format_timestamp, relevance_marker, RenderOptions};
use crate::analysis::{AnalysisReport, Breakdown};
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &AnalysisReport, options: RenderOptions) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report, options));
    md.push('\n');

    md.push_str(&render_breakdown("Category Breakdown", &report.category, None));
    md.push('\n');

    md.push_str(&render_breakdown("Relevance Analysis", &report.relevance, Some(options)));
    md.push('\n');

    md.push_str(&render_ranking(report));
    md.push('\n');

    md.push_str(&render_breakdown("Deployment Type Analysis", &report.deployment, None));
    md.push('\n');

    md.push_str(&render_proximity(report));
    md.push('\n');

    md.push_str(&render_breakdown("Detection Type", &report.kind, None));
    md.push('\n');

    if let Some(mobility) = &report.mobility {
        md.push_str(&render_breakdown("Mobility", mobility, None));
        md.push('\n');
    }

    md.push_str(&render_high_risk(report, options));

    Ok(md)
}

fn render_header(report: &AnalysisReport, options: RenderOptions) -> String {
    let s = &report.summary;
    let icon = if options.emoji { "📡 " } else { "" };

    let mut md = format!("# {}Detection Log Analysis\n\n## Summary\n\n", icon);
    md.push_str("| Metric | Value |\n|--------|-------|\n");
    md.push_str(&format!("| Total Detections | {} |\n", s.total_detections));
    md.push_str(&format!("| Unique Devices (MAC) | {} |\n", s.unique_devices));
    md.push_str(&format!("| Unique Manufacturers | {} |\n", s.unique_manufacturers));
    if let Some(sessions) = s.sessions {
        md.push_str(&format!("| Scan Sessions | {} |\n", sessions));
    }
    if let Some(minutes) = s.time_range_minutes {
        md.push_str(&format!("| Time Range | {:.1} minutes |\n", minutes));
    }
    if let Some(first) = s.first_timestamp {
        md.push_str(&format!("| First Detection | {} |\n", format_timestamp(first)));
    }
    if let Some(last) = s.last_timestamp {
        md.push_str(&format!("| Last Detection | {} |\n", format_timestamp(last)));
    }
    md
}

/// Pipes in free text would break the table
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn render_breakdown(title: &str, breakdown: &Breakdown, markers: Option<RenderOptions>) -> String {
    let mut md = format!("## {}\n\n", title);
    if breakdown.rows.is_empty() {
        md.push_str("_No data._\n");
        return md;
    }
    md.push_str("| Value | Count | Share |\n|-------|------:|------:|\n");
    for row in &breakdown.rows {
        let marker = markers
            .map(|opts| format!("{} ", relevance_marker(&row.value, opts)))
            .unwrap_or_default();
        md.push_str(&format!(
            "| {}{} | {} | {:.1}% |\n",
            marker,
            escape_cell(&row.value),
            row.count,
            row.percentage
        ));
    }
    md
}

fn render_ranking(report: &AnalysisReport) -> String {
    let mut md = format!("## Top {} Manufacturers\n\n", report.manufacturers.top_n);
    if report.manufacturers.rows.is_empty() {
        md.push_str("_No data._\n");
        return md;
    }
    md.push_str("| # | Manufacturer | Count | Share |\n|--:|--------------|------:|------:|\n");
    for row in &report.manufacturers.rows {
        md.push_str(&format!(
            "| {} | {} | {} | {:.1}% |\n",
            row.rank,
            escape_cell(&row.value),
            row.count,
            row.percentage
        ));
    }
    md
}

fn render_proximity(report: &AnalysisReport) -> String {
    let mut md = String::from("## Signal Strength (RSSI)\n\n");
    match &report.proximity.statistics {
        Some(stats) => {
            md.push_str(&format!(
                "- **Average:** {:.1} dBm\n- **Strongest:** {} dBm\n- **Weakest:** {} dBm\n- **Median:** {:.1} dBm\n\n",
                stats.mean, stats.max, stats.min, stats.median
            ));
        }
        None => md.push_str("_No signal data._\n\n"),
    }
    md.push_str("| Proximity | Count | Share |\n|-----------|------:|------:|\n");
    for bucket in &report.proximity.buckets {
        md.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            bucket.bucket.label(),
            bucket.count,
            bucket.percentage
        ));
    }
    md
}

fn render_high_risk(report: &AnalysisReport, options: RenderOptions) -> String {
    let high_risk = &report.high_risk;
    let mut md = String::from("## High-Risk Device Detections\n\n");
    if high_risk.total == 0 {
        md.push_str("No high-risk devices detected.\n");
        return md;
    }

    md.push_str(&format!(
        "Found **{}** high-risk detections (showing {}).\n\n",
        high_risk.total,
        high_risk.shown.len()
    ));
    md.push_str("| | Manufacturer | Category | RSSI | Notes |\n|-|--------------|----------|-----:|-------|\n");
    let marker = relevance_marker("HIGH", options);
    for entry in &high_risk.shown {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            marker,
            escape_cell(&entry.manufacturer),
            escape_cell(&entry.category),
            entry.rssi,
            escape_cell(&entry.notes)
        ));
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{empty_report, test_report};

    #[test]
    fn test_markdown_structure() {
        let md = render(&test_report(), RenderOptions::default()).unwrap();
        assert!(md.starts_with("# 📡 Detection Log Analysis"));
        assert!(md.contains("| Time Range | 5.0 minutes |"));
        assert!(md.contains("| First Detection | 2023-11-14 22:13:20 UTC |"));
        assert!(md.contains("## Top 10 Manufacturers"));
        assert!(md.contains("| 1 | Hikvision | 1 | 33.3% |"));
        assert!(md.contains("| Far (<-90 dBm) | 1 | 33.3% |"));
        assert!(md.contains("Found **1** high-risk detections"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }

    #[test]
    fn test_markdown_empty_log() {
        let md = render(&empty_report(), RenderOptions { emoji: false }).unwrap();
        assert!(md.starts_with("# Detection Log Analysis"));
        assert!(md.contains("_No data._"));
        assert!(md.contains("No high-risk devices detected."));
    }
}
