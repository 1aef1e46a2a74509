//! Text (terminal) reporter with colors and formatting

use super::{format_timestamp, relevance_marker, RenderOptions};
use crate::analysis::{AnalysisReport, Breakdown, ProximityBucket};
use anyhow::Result;
use console::style;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", style(title).bold())?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Render report as formatted terminal output
pub fn render(report: &AnalysisReport, options: RenderOptions) -> Result<String> {
    let mut out = String::new();

    render_summary(&mut out, report)?;
    render_breakdown(&mut out, "CATEGORY BREAKDOWN", &report.category, 15, None)?;
    render_breakdown(&mut out, "RELEVANCE ANALYSIS", &report.relevance, 10, Some(options))?;
    render_ranking(&mut out, report)?;
    render_breakdown(&mut out, "DEPLOYMENT TYPE ANALYSIS", &report.deployment, 15, None)?;
    render_proximity(&mut out, report)?;
    render_breakdown(&mut out, "DETECTION TYPE (BLE vs WiFi)", &report.kind, 8, None)?;
    if let Some(mobility) = &report.mobility {
        render_breakdown(&mut out, "MOBILITY (FIXED vs MOBILE)", mobility, 8, None)?;
    }
    render_high_risk(&mut out, report, options)?;

    Ok(out)
}

fn render_summary(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    let s = &report.summary;
    section(out, "DETECTION SUMMARY")?;
    writeln!(out)?;
    writeln!(out, "Total Detections: {}", style(s.total_detections).cyan())?;
    writeln!(out, "Unique Devices (MAC): {}", style(s.unique_devices).cyan())?;
    writeln!(out, "Unique Manufacturers: {}", style(s.unique_manufacturers).cyan())?;
    if let Some(sessions) = s.sessions {
        writeln!(out, "Scan Sessions: {}", sessions)?;
    }
    if let Some(minutes) = s.time_range_minutes {
        writeln!(out, "Time Range: {:.1} minutes", minutes)?;
    }
    if let (Some(first), Some(last)) = (s.first_timestamp, s.last_timestamp) {
        writeln!(
            out,
            "{}",
            style(format!("  {} -> {}", format_timestamp(first), format_timestamp(last))).dim()
        )?;
    }
    Ok(())
}

fn render_breakdown(
    out: &mut String,
    title: &str,
    breakdown: &Breakdown,
    width: usize,
    markers: Option<RenderOptions>,
) -> std::fmt::Result {
    section(out, title)?;
    if breakdown.rows.is_empty() {
        writeln!(out, "  {}", style("No data").dim())?;
        return Ok(());
    }
    for row in &breakdown.rows {
        let marker = markers
            .map(|opts| format!("{} ", relevance_marker(&row.value, opts)))
            .unwrap_or_default();
        writeln!(
            out,
            "  {}{:<width$}: {:4} ({:5.1}%)",
            marker,
            row.value,
            row.count,
            row.percentage,
            width = width
        )?;
    }
    Ok(())
}

fn render_ranking(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    section(out, &format!("TOP {} MANUFACTURERS", report.manufacturers.top_n))?;
    if report.manufacturers.rows.is_empty() {
        writeln!(out, "  {}", style("No data").dim())?;
        return Ok(());
    }
    for row in &report.manufacturers.rows {
        writeln!(
            out,
            "  {:2}. {:<25}: {:4} ({:5.1}%)",
            row.rank, row.value, row.count, row.percentage
        )?;
    }
    Ok(())
}

fn render_proximity(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    section(out, "SIGNAL STRENGTH (RSSI) STATISTICS")?;
    match &report.proximity.statistics {
        Some(stats) => {
            writeln!(out, "  Average RSSI: {:.1} dBm", stats.mean)?;
            writeln!(out, "  Strongest Signal: {:.1} dBm", f64::from(stats.max))?;
            writeln!(out, "  Weakest Signal: {:.1} dBm", f64::from(stats.min))?;
            writeln!(out, "  Median RSSI: {:.1} dBm", stats.median)?;
        }
        None => writeln!(out, "  {}", style("No signal data").dim())?,
    }

    writeln!(out)?;
    writeln!(out, "  Proximity Breakdown:")?;
    for bucket in &report.proximity.buckets {
        let label = format!("{}:", bucket.bucket.label());
        let styled = match bucket.bucket {
            ProximityBucket::VeryClose => style(label).red(),
            ProximityBucket::Near => style(label).yellow(),
            ProximityBucket::Medium => style(label).green(),
            ProximityBucket::Far => style(label).dim(),
        };
        writeln!(
            out,
            "    {:<25} {:4} ({:5.1}%)",
            styled, bucket.count, bucket.percentage
        )?;
    }
    Ok(())
}

fn render_high_risk(out: &mut String, report: &AnalysisReport, options: RenderOptions) -> std::fmt::Result {
    section(out, "HIGH-RISK DEVICE DETECTIONS")?;
    let high_risk = &report.high_risk;
    if high_risk.total == 0 {
        writeln!(out, "  No high-risk devices detected")?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "  Found {} high-risk detections:", style(high_risk.total).red().bold())?;
    writeln!(out)?;
    let marker = relevance_marker("HIGH", options);
    for entry in &high_risk.shown {
        writeln!(
            out,
            "  {} {:<20} | {:<10} | RSSI:{:4} | {}",
            marker, entry.manufacturer, entry.category, entry.rssi, entry.notes
        )?;
    }

    let remaining = high_risk.total.saturating_sub(high_risk.shown.len());
    if remaining > 0 {
        writeln!(
            out,
            "\n  {}",
            style(format!("...and {} more (see the summary CSV or --format json)", remaining)).dim()
        )?;
    }
    Ok(())
}
