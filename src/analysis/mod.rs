//! Detection log analysis engine
//!
//! Pure computations over an immutable [`RecordTable`](crate::models::RecordTable):
//!
//! - [`aggregate`] - categorical breakdowns, top-N ranking, grouped export summary
//! - [`proximity`] - RSSI statistics and the four-way proximity histogram
//! - [`high_risk`] - HIGH relevance selection in original order
//! - [`grouping`] - the shared group-by and percentage primitives
//! - [`report`] - assembles everything into an [`AnalysisReport`]
//!
//! Nothing in this module touches the filesystem.
//!
//! # Ordering rules
//!
//! Every breakdown is sorted by count descending. Ties keep the order in
//! which the value first appeared in the table. Export summary rows break
//! ties on (manufacturer, category, relevance) ascending.

pub mod aggregate;
pub mod grouping;
pub mod high_risk;
pub mod proximity;
pub mod report;

pub use aggregate::{export_summary, group_count, rank, GroupRow, RankedRow, SummaryRow};
pub use grouping::percentage;
pub use high_risk::{select, HighRiskEntry, HighRiskSelection};
pub use proximity::{bucket_counts, BucketCount, ProximityBucket, RssiStatistics};
pub use report::{AnalysisReport, Breakdown, HighRiskReport, OverallSummary, ProximityReport, Ranking};

use crate::models::DetectionRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of entries in the manufacturer ranking
pub const DEFAULT_TOP_N: usize = 10;

/// Default number of high-risk sightings listed in the report
pub const HIGH_RISK_DISPLAY_CAP: usize = 20;

/// Errors raised by the analysis engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Schema error at row {row}: field '{field}' {reason}")]
    Schema {
        row: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Cannot compute {operation} over an empty table")]
    EmptyInput { operation: &'static str },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Categorical field a breakdown can group on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Category,
    Relevance,
    Deployment,
    Type,
    Manufacturer,
    Mobility,
}

impl Field {
    /// Grouping key for a record
    pub fn value<'a>(&self, record: &'a DetectionRecord) -> &'a str {
        match self {
            Field::Category => &record.category,
            Field::Relevance => record.relevance.as_str(),
            Field::Deployment => &record.deployment,
            Field::Type => record.kind.as_str(),
            Field::Manufacturer => &record.manufacturer,
            Field::Mobility => record.mobility().map_or("UNKNOWN", |m| m.as_str()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::Category => "category",
            Field::Relevance => "relevance",
            Field::Deployment => "deployment",
            Field::Type => "type",
            Field::Manufacturer => "manufacturer",
            Field::Mobility => "mobility",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Explicit parameters for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Entries kept in the manufacturer ranking
    pub top_n: usize,
    /// High-risk sightings exposed for display
    pub high_risk_display_cap: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            high_risk_display_cap: HIGH_RISK_DISPLAY_CAP,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.top_n == 0 {
            return Err(AnalysisError::Config("top_n must be at least 1".into()));
        }
        if self.high_risk_display_cap == 0 {
            return Err(AnalysisError::Config(
                "high_risk_display_cap must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
