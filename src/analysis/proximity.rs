//! RSSI statistics and proximity buckets
//!
//! | Bucket      | Condition (dBm)       |
//! |-------------|-----------------------|
//! | VERY_CLOSE  | rssi > -50            |
//! | NEAR        | -70 < rssi <= -50     |
//! | MEDIUM      | -90 < rssi <= -70     |
//! | FAR         | rssi <= -90           |

use super::grouping::percentage;
use super::{AnalysisError, AnalysisResult};
use crate::models::RecordTable;
use serde::{Deserialize, Serialize};

/// Anything stronger than this is VERY_CLOSE
pub const VERY_CLOSE_ABOVE_DBM: i32 = -50;
/// Lower (exclusive) edge of NEAR
pub const NEAR_ABOVE_DBM: i32 = -70;
/// Lower (exclusive) edge of MEDIUM; at or below is FAR
pub const MEDIUM_ABOVE_DBM: i32 = -90;

/// Approximate physical distance derived from signal strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProximityBucket {
    VeryClose,
    Near,
    Medium,
    Far,
}

impl ProximityBucket {
    /// All buckets, strongest first
    pub const ALL: [ProximityBucket; 4] = [
        ProximityBucket::VeryClose,
        ProximityBucket::Near,
        ProximityBucket::Medium,
        ProximityBucket::Far,
    ];

    pub fn classify(rssi: i32) -> Self {
        if rssi > VERY_CLOSE_ABOVE_DBM {
            ProximityBucket::VeryClose
        } else if rssi > NEAR_ABOVE_DBM {
            ProximityBucket::Near
        } else if rssi > MEDIUM_ABOVE_DBM {
            ProximityBucket::Medium
        } else {
            ProximityBucket::Far
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProximityBucket::VeryClose => "Very Close (>-50 dBm)",
            ProximityBucket::Near => "Near (-50 to -70 dBm)",
            ProximityBucket::Medium => "Medium (-70 to -90 dBm)",
            ProximityBucket::Far => "Far (<-90 dBm)",
        }
    }

    fn index(&self) -> usize {
        match self {
            ProximityBucket::VeryClose => 0,
            ProximityBucket::Near => 1,
            ProximityBucket::Medium => 2,
            ProximityBucket::Far => 3,
        }
    }
}

/// Count of records in one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: ProximityBucket,
    pub count: usize,
    pub percentage: f64,
}

/// Descriptive statistics over the `rssi` column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RssiStatistics {
    pub mean: f64,
    /// Strongest signal
    pub max: i32,
    /// Weakest signal
    pub min: i32,
    pub median: f64,
}

impl RssiStatistics {
    pub fn compute(table: &RecordTable) -> AnalysisResult<Self> {
        if table.is_empty() {
            return Err(AnalysisError::EmptyInput {
                operation: "RSSI statistics",
            });
        }

        let mut values: Vec<i32> = table.iter().map(|r| r.rssi).collect();
        values.sort_unstable();

        let n = values.len();
        let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
        let median = if n % 2 == 1 {
            f64::from(values[n / 2])
        } else {
            (f64::from(values[n / 2 - 1]) + f64::from(values[n / 2])) / 2.0
        };

        Ok(Self {
            mean: sum as f64 / n as f64,
            max: values[n - 1],
            min: values[0],
            median,
        })
    }
}

/// Histogram over all four buckets, strongest first.
///
/// Always returns four entries; counts sum to `table.len()`.
pub fn bucket_counts(table: &RecordTable) -> Vec<BucketCount> {
    let mut counts = [0usize; 4];
    for record in table {
        counts[ProximityBucket::classify(record.rssi).index()] += 1;
    }

    ProximityBucket::ALL
        .iter()
        .map(|&bucket| {
            let count = counts[bucket.index()];
            BucketCount {
                bucket,
                count,
                percentage: percentage(count, table.len()),
            }
        })
        .collect()
}
