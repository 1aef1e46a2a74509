//! HIGH relevance sightings, in original table order

use super::{AnalysisError, AnalysisResult};
use crate::models::{DetectionRecord, RecordTable, Relevance};
use serde::{Deserialize, Serialize};

/// Display fields for one high-risk sighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighRiskEntry {
    pub manufacturer: String,
    pub category: String,
    pub rssi: i32,
    pub notes: String,
}

impl From<&DetectionRecord> for HighRiskEntry {
    fn from(record: &DetectionRecord) -> Self {
        Self {
            manufacturer: record.manufacturer.clone(),
            category: record.category.clone(),
            rssi: record.rssi,
            notes: record.notes.clone(),
        }
    }
}

/// Every HIGH record borrowed from the table, plus the display cap
#[derive(Debug, Clone)]
pub struct HighRiskSelection<'a> {
    records: Vec<&'a DetectionRecord>,
    display_cap: usize,
}

impl<'a> HighRiskSelection<'a> {
    /// Full filtered sequence
    pub fn records(&self) -> &[&'a DetectionRecord] {
        &self.records
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// No HIGH relevance sightings in the table
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `display_cap` sightings
    pub fn displayed(&self) -> impl Iterator<Item = HighRiskEntry> + '_ {
        self.records
            .iter()
            .take(self.display_cap)
            .map(|r| HighRiskEntry::from(*r))
    }
}

/// Filter to HIGH relevance without reordering.
pub fn select(table: &RecordTable, display_cap: usize) -> AnalysisResult<HighRiskSelection<'_>> {
    if display_cap == 0 {
        return Err(AnalysisError::Config(
            "high-risk display cap must be at least 1".into(),
        ));
    }
    Ok(HighRiskSelection {
        records: table
            .iter()
            .filter(|r| r.relevance == Relevance::High)
            .collect(),
        display_cap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::sample_table;

    #[test]
    fn test_select_is_exact_subset_in_order() {
        let table = sample_table();
        let selection = select(&table, 20).unwrap();
        let expected: Vec<&DetectionRecord> = table
            .iter()
            .filter(|r| r.relevance == Relevance::High)
            .collect();
        assert_eq!(selection.records(), expected.as_slice());
        assert_eq!(selection.total(), 3);
        let timestamps: Vec<i64> = selection.records().iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![1_000, 3_000, 4_000]);
    }

    #[test]
    fn test_display_cap_keeps_first_entries() {
        let records: Vec<DetectionRecord> = (0..30)
            .map(|i| {
                DetectionRecord::new(i, format!("mac-{i}"), format!("Vendor {i}"), "ANPR", Relevance::High, -60)
            })
            .collect();
        let table = RecordTable::new(records).unwrap();
        let selection = select(&table, 20).unwrap();
        assert_eq!(selection.total(), 30);
        let shown: Vec<HighRiskEntry> = selection.displayed().collect();
        assert_eq!(shown.len(), 20);
        assert_eq!(shown[0].manufacturer, "Vendor 0");
        assert_eq!(shown[19].manufacturer, "Vendor 19");
    }

    #[test]
    fn test_no_high_risk_is_not_an_error() {
        let table = RecordTable::new(vec![DetectionRecord::new(
            0,
            "74:C6:3B:00:00:01",
            "Ring (Amazon)",
            "Doorbell",
            Relevance::Low,
            -65,
        )])
        .unwrap();
        let selection = select(&table, 20).unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.displayed().count(), 0);
    }

    #[test]
    fn test_zero_cap_is_config_error() {
        assert!(matches!(select(&sample_table(), 0), Err(AnalysisError::Config(_))));
    }
}
