//! Grouped summary artifact (`analysis_summary.csv`)
//!
//! Columns: `Manufacturer,Category,Relevance,Count,Avg_RSSI`. The file is
//! replaced on every run, never appended to.

use crate::analysis::SummaryRow;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serialize summary rows to CSV bytes
pub fn to_csv(rows: &[SummaryRow]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // Header written explicitly so an empty summary still has one
    wtr.write_record(["Manufacturer", "Category", "Relevance", "Count", "Avg_RSSI"])?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.into_inner().context("Failed to flush summary CSV")
}

/// Write the summary to `path`, replacing any previous file.
///
/// Goes through a sibling temp file so a failure never leaves a partial
/// summary behind.
pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    let bytes = to_csv(rows)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let tmp = temp_path(path);
    std::fs::write(&tmp, &bytes).with_context(|| format!("Failed to write {}", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
    }

    debug!("Wrote {} summary rows to {}", rows.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "analysis_summary.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Relevance;

    fn rows() -> Vec<SummaryRow> {
        vec![
            SummaryRow {
                manufacturer: "Hikvision".into(),
                category: "CCTV".into(),
                relevance: Relevance::High,
                count: 2,
                avg_rssi: -60.0,
            },
            SummaryRow {
                manufacturer: "Ring (Amazon)".into(),
                category: "Doorbell".into(),
                relevance: Relevance::Low,
                count: 1,
                avg_rssi: -72.5,
            },
        ]
    }

    #[test]
    fn test_csv_layout() {
        let csv = String::from_utf8(to_csv(&rows()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Manufacturer,Category,Relevance,Count,Avg_RSSI");
        assert_eq!(lines[1], "Hikvision,CCTV,HIGH,2,-60.0");
        assert_eq!(lines[2], "Ring (Amazon),Doorbell,LOW,1,-72.5");
    }

    #[test]
    fn test_empty_summary_has_header() {
        let csv = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv, "Manufacturer,Category,Relevance,Count,Avg_RSSI\n");
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("analysis_summary.csv");
        write_summary(&path, &rows()).unwrap();
        write_summary(&path, &rows()[..1]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!temp_path(&path).exists());
    }
}
