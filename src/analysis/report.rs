//! Structured analysis report
//!
//! Combines the aggregation engine, proximity classifier and high-risk
//! selector into one serializable report. Sections appear in a fixed order:
//! overall summary, category, relevance, manufacturer ranking, deployment,
//! RSSI/proximity, type, mobility (appliance logs only) and high-risk list.

use super::aggregate::{group_count, rank, GroupRow, RankedRow};
use super::high_risk::{select, HighRiskEntry};
use super::proximity::{bucket_counts, BucketCount, RssiStatistics};
use super::{AnalysisError, AnalysisOptions, AnalysisResult, Field};
use crate::models::RecordTable;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Headline counts for the whole log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_detections: usize,
    pub unique_devices: usize,
    pub unique_manufacturers: usize,
    /// `(max(timestamp) - min(timestamp)) / 60000`; absent for an empty log
    pub time_range_minutes: Option<f64>,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    /// Distinct scanning sessions, when the log carries a session column
    pub sessions: Option<usize>,
}

impl OverallSummary {
    pub fn compute(table: &RecordTable) -> Self {
        let unique_devices = table.iter().map(|r| r.mac.as_str()).collect::<FxHashSet<_>>().len();
        let unique_manufacturers = table
            .iter()
            .map(|r| r.manufacturer.as_str())
            .collect::<FxHashSet<_>>()
            .len();

        let first_timestamp = table.iter().map(|r| r.timestamp).min();
        let last_timestamp = table.iter().map(|r| r.timestamp).max();
        let time_range_minutes = first_timestamp
            .zip(last_timestamp)
            .map(|(min, max)| max.abs_diff(min) as f64 / 60_000.0);

        let session_ids: FxHashSet<&str> = table.iter().filter_map(|r| r.session_id()).collect();
        let sessions = (!session_ids.is_empty()).then_some(session_ids.len());

        Self {
            total_detections: table.len(),
            unique_devices,
            unique_manufacturers,
            time_range_minutes,
            first_timestamp,
            last_timestamp,
            sessions,
        }
    }
}

/// A titled breakdown over one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub field: Field,
    pub rows: Vec<GroupRow>,
}

impl Breakdown {
    pub fn compute(table: &RecordTable, field: Field) -> Self {
        Self {
            field,
            rows: group_count(table, field),
        }
    }
}

/// Signal-strength section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityReport {
    /// Absent when the log is empty
    pub statistics: Option<RssiStatistics>,
    pub buckets: Vec<BucketCount>,
}

impl ProximityReport {
    pub fn compute(table: &RecordTable) -> AnalysisResult<Self> {
        let statistics = match RssiStatistics::compute(table) {
            Ok(stats) => Some(stats),
            Err(AnalysisError::EmptyInput { operation }) => {
                debug!("Skipping {} for empty log", operation);
                None
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            statistics,
            buckets: bucket_counts(table),
        })
    }
}

/// High-risk section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighRiskReport {
    pub total: usize,
    pub shown: Vec<HighRiskEntry>,
}

/// Manufacturer ranking with the requested size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub top_n: usize,
    pub rows: Vec<RankedRow>,
}

/// Full analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: OverallSummary,
    pub category: Breakdown,
    pub relevance: Breakdown,
    pub manufacturers: Ranking,
    pub deployment: Breakdown,
    pub proximity: ProximityReport,
    #[serde(rename = "type")]
    pub kind: Breakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobility: Option<Breakdown>,
    pub high_risk: HighRiskReport,
}

struct Aggregates {
    summary: OverallSummary,
    category: Breakdown,
    relevance: Breakdown,
    manufacturers: Ranking,
    deployment: Breakdown,
    kind: Breakdown,
    mobility: Option<Breakdown>,
}

fn aggregate(table: &RecordTable, top_n: usize) -> AnalysisResult<Aggregates> {
    let has_mobility = table.iter().any(|r| r.mobility().is_some());
    Ok(Aggregates {
        summary: OverallSummary::compute(table),
        category: Breakdown::compute(table, Field::Category),
        relevance: Breakdown::compute(table, Field::Relevance),
        manufacturers: Ranking {
            top_n,
            rows: rank(table, Field::Manufacturer, top_n)?,
        },
        deployment: Breakdown::compute(table, Field::Deployment),
        kind: Breakdown::compute(table, Field::Type),
        mobility: has_mobility.then(|| Breakdown::compute(table, Field::Mobility)),
    })
}

fn high_risk(table: &RecordTable, display_cap: usize) -> AnalysisResult<HighRiskReport> {
    let selection = select(table, display_cap)?;
    Ok(HighRiskReport {
        total: selection.total(),
        shown: selection.displayed().collect(),
    })
}

impl AnalysisReport {
    /// Run every component against `table`.
    ///
    /// The three components only read the table, so they run in parallel;
    /// each one owns its ordering, so output matches a sequential run.
    pub fn build(table: &RecordTable, options: &AnalysisOptions) -> AnalysisResult<Self> {
        options.validate()?;
        debug!(
            "Building report over {} detections (top_n={}, display_cap={})",
            table.len(),
            options.top_n,
            options.high_risk_display_cap
        );

        let (aggregates, (proximity, high_risk)) = rayon::join(
            || aggregate(table, options.top_n),
            || {
                rayon::join(
                    || ProximityReport::compute(table),
                    || high_risk(table, options.high_risk_display_cap),
                )
            },
        );
        let aggregates = aggregates?;

        Ok(Self {
            summary: aggregates.summary,
            category: aggregates.category,
            relevance: aggregates.relevance,
            manufacturers: aggregates.manufacturers,
            deployment: aggregates.deployment,
            proximity: proximity?,
            kind: aggregates.kind,
            mobility: aggregates.mobility,
            high_risk: high_risk?,
        })
    }
}
