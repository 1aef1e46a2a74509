//! Categorical breakdowns, rankings and the grouped export summary

use super::grouping::{count_by, group_fold, percentage};
use super::{AnalysisError, AnalysisResult, Field};
use crate::models::{RecordTable, Relevance};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of a breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

/// One row of a ranking, with its 1-based position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub rank: usize,
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

/// Grouped (manufacturer, category, relevance) aggregate for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Relevance")]
    pub relevance: Relevance,
    #[serde(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Avg_RSSI")]
    pub avg_rssi: f64,
}

/// Count and percentage per distinct value of `field`.
///
/// Empty tables yield no rows.
pub fn group_count(table: &RecordTable, field: Field) -> Vec<GroupRow> {
    let total = table.len();
    count_by(table.iter().map(|r| field.value(r)))
        .into_iter()
        .map(|(value, count)| GroupRow {
            value: value.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// The first `top_n` rows of [`group_count`], numbered from 1.
pub fn rank(table: &RecordTable, field: Field, top_n: usize) -> AnalysisResult<Vec<RankedRow>> {
    if top_n == 0 {
        return Err(AnalysisError::Config("top_n must be at least 1".into()));
    }
    Ok(group_count(table, field)
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, row)| RankedRow {
            rank: i + 1,
            value: row.value,
            count: row.count,
            percentage: row.percentage,
        })
        .collect())
}

/// Group by (manufacturer, category, relevance) with count and mean RSSI.
///
/// Sorted by count descending, then by the group key ascending.
pub fn export_summary(table: &RecordTable) -> Vec<SummaryRow> {
    let groups = group_fold(
        table.iter().map(|r| {
            (
                (r.manufacturer.as_str(), r.category.as_str(), r.relevance),
                r.rssi,
            )
        }),
        || (0usize, 0i64),
        |(count, sum), rssi| {
            *count += 1;
            *sum += i64::from(rssi);
        },
    );

    let mut rows: Vec<SummaryRow> = groups
        .into_iter()
        .map(|((manufacturer, category, relevance), (count, sum))| SummaryRow {
            manufacturer: manufacturer.to_string(),
            category: category.to_string(),
            relevance,
            count,
            avg_rssi: sum as f64 / count as f64,
        })
        .collect();

    rows.sort_by(compare_summary_rows);
    rows
}

fn compare_summary_rows(a: &SummaryRow, b: &SummaryRow) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| a.manufacturer.cmp(&b.manufacturer))
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| a.relevance.as_str().cmp(b.relevance.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::sample_table;
    use crate::models::DetectionRecord;

    #[test]
    fn test_category_breakdown() {
        let rows = group_count(&sample_table(), Field::Category);
        let values: Vec<(&str, usize)> = rows.iter().map(|r| (r.value.as_str(), r.count)).collect();
        assert_eq!(
            values,
            vec![("CCTV", 3), ("Doorbell", 1), ("Drone", 1), ("Cloud CCTV", 1)]
        );
        assert!((rows[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdowns_sum_to_table_len() {
        let table = sample_table();
        for field in [Field::Category, Field::Relevance, Field::Deployment, Field::Type] {
            let rows = group_count(&table, field);
            let count: usize = rows.iter().map(|r| r.count).sum();
            let pct: f64 = rows.iter().map(|r| r.percentage).sum();
            assert_eq!(count, table.len(), "{field} counts");
            assert!((pct - 100.0).abs() < 0.01, "{field} percentages sum to {pct}");
        }
    }

    #[test]
    fn test_empty_table_breakdown_has_no_rows() {
        let table = RecordTable::empty();
        assert!(group_count(&table, Field::Relevance).is_empty());
        assert!(rank(&table, Field::Manufacturer, 10).unwrap().is_empty());
        assert!(export_summary(&table).is_empty());
    }

    #[test]
    fn test_rank_truncates_and_numbers() {
        let ranked = rank(&sample_table(), Field::Manufacturer, 2).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].value, "Hikvision");
        assert_eq!(ranked[0].count, 2);
        // All others tie at 1; first seen wins
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[1].value, "Ring (Amazon)");
    }

    #[test]
    fn test_rank_returns_all_when_fewer_than_top_n() {
        let ranked = rank(&sample_table(), Field::Manufacturer, 50).unwrap();
        assert_eq!(ranked.len(), 5);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_rank_rejects_zero() {
        assert!(matches!(
            rank(&sample_table(), Field::Manufacturer, 0),
            Err(AnalysisError::Config(_))
        ));
    }

    #[test]
    fn test_export_summary_averages_group() {
        let table = RecordTable::new(vec![
            DetectionRecord::new(0, "AA:01", "Axis Communications", "CCTV", Relevance::High, -50),
            DetectionRecord::new(1, "AA:02", "Axis Communications", "CCTV", Relevance::High, -70),
        ])
        .unwrap();
        let rows = export_summary(&table);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].avg_rssi, -60.0);
    }

    #[test]
    fn test_export_summary_tie_break_is_lexicographic() {
        let table = RecordTable::new(vec![
            DetectionRecord::new(0, "m1", "Reolink", "CCTV", Relevance::Low, -60),
            DetectionRecord::new(1, "m2", "Axis Communications", "CCTV", Relevance::High, -60),
            DetectionRecord::new(2, "m3", "Axis Communications", "Body Cam", Relevance::High, -60),
            DetectionRecord::new(3, "m4", "DJI", "Drone", Relevance::High, -40),
            DetectionRecord::new(4, "m5", "DJI", "Drone", Relevance::High, -80),
        ])
        .unwrap();
        let keys: Vec<(String, String, usize)> = export_summary(&table)
            .into_iter()
            .map(|r| (r.manufacturer, r.category, r.count))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("DJI".into(), "Drone".into(), 2),
                ("Axis Communications".into(), "Body Cam".into(), 1),
                ("Axis Communications".into(), "CCTV".into(), 1),
                ("Reolink".into(), "CCTV".into(), 1),
            ]
        );
    }

    #[test]
    fn test_export_summary_counts_cover_table() {
        let table = sample_table();
        let total: usize = export_summary(&table).iter().map(|r| r.count).sum();
        assert_eq!(total, table.len());
    }
}
