//! Core data models for the detection log analyzer
//!
//! These models are shared by ingestion, the analysis engine and the
//! reporters. A [`RecordTable`] is built once per run and never mutated.

use crate::analysis::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Risk/interest tier assigned to a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relevance {
    Low,
    Medium,
    High,
}

impl Relevance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relevance::Low => "LOW",
            Relevance::Medium => "MEDIUM",
            Relevance::High => "HIGH",
        }
    }
}

impl std::fmt::Display for Relevance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relevance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Relevance::High),
            "MEDIUM" => Ok(Relevance::Medium),
            "LOW" => Ok(Relevance::Low),
            other => Err(format!(
                "unknown relevance '{}'. Valid values: HIGH, MEDIUM, LOW",
                other
            )),
        }
    }
}

/// Transport/protocol of a sighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DetectionType {
    Ble,
    Wifi,
}

impl DetectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionType::Ble => "BLE",
            DetectionType::Wifi => "WIFI",
        }
    }
}

impl std::fmt::Display for DetectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BLE" => Ok(DetectionType::Ble),
            "WIFI" | "WI-FI" => Ok(DetectionType::Wifi),
            other => Err(format!("unknown detection type '{}'. Valid values: BLE, WIFI", other)),
        }
    }
}

/// Whether the appliance judged the device stationary across sightings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mobility {
    Fixed,
    Mobile,
}

impl Mobility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mobility::Fixed => "FIXED",
            Mobility::Mobile => "MOBILE",
        }
    }
}

impl FromStr for Mobility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FIXED" | "TRUE" | "1" => Ok(Mobility::Fixed),
            "MOBILE" | "FALSE" | "0" => Ok(Mobility::Mobile),
            other => Err(format!("unknown mobility '{}'. Valid values: FIXED, MOBILE", other)),
        }
    }
}

/// One observed sighting of a wireless device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Milliseconds since epoch, in scan order
    pub timestamp: i64,
    pub mac: String,
    pub manufacturer: String,
    pub category: String,
    pub relevance: Relevance,
    pub deployment: String,
    /// Received signal strength in dBm
    pub rssi: i32,
    #[serde(rename = "type")]
    pub kind: DetectionType,
    #[serde(default)]
    pub notes: String,
    /// Extra columns written by the appliance's extended log format
    #[serde(default)]
    pub extended: Option<ApplianceFields>,
}

impl DetectionRecord {
    /// Minimal record with the nine core columns; used by ingestion and tests.
    pub fn new(
        timestamp: i64,
        mac: impl Into<String>,
        manufacturer: impl Into<String>,
        category: impl Into<String>,
        relevance: Relevance,
        rssi: i32,
    ) -> Self {
        Self {
            timestamp,
            mac: mac.into(),
            manufacturer: manufacturer.into(),
            category: category.into(),
            relevance,
            deployment: "Unknown".to_string(),
            rssi,
            kind: DetectionType::Ble,
            notes: String::new(),
            extended: None,
        }
    }

    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    pub fn with_kind(mut self, kind: DetectionType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_extended(mut self, extended: ApplianceFields) -> Self {
        self.extended = Some(extended);
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.extended.as_ref().and_then(|e| e.session_id.as_deref())
    }

    pub fn mobility(&self) -> Option<Mobility> {
        self.extended.as_ref().and_then(|e| e.mobility)
    }
}

/// Optional per-device tracking columns from the appliance's 20-column log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplianceFields {
    pub session_id: Option<String>,
    /// Real Unix time in seconds, when the appliance had an RTC fix
    pub unix_time: Option<i64>,
    pub oui: Option<String>,
    pub rssi_min: Option<i32>,
    pub rssi_max: Option<i32>,
    pub rssi_avg: Option<f64>,
    pub seen_count: Option<u32>,
    pub first_seen: Option<i64>,
    pub last_seen: Option<i64>,
    pub duration_ms: Option<i64>,
    pub mobility: Option<Mobility>,
}

/// Ordered, immutable collection of detection records
///
/// Insertion order is the original file order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordTable {
    records: Vec<DetectionRecord>,
}

impl RecordTable {
    /// Build a table, rejecting records with blank identity fields.
    pub fn new(records: Vec<DetectionRecord>) -> AnalysisResult<Self> {
        for (row, record) in records.iter().enumerate() {
            let required = [
                ("mac", &record.mac),
                ("manufacturer", &record.manufacturer),
                ("category", &record.category),
            ];
            for (field, value) in required {
                if value.trim().is_empty() {
                    return Err(AnalysisError::Schema {
                        row,
                        field,
                        reason: "value is blank".to_string(),
                    });
                }
            }
        }
        Ok(Self { records })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectionRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[DetectionRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a DetectionRecord;
    type IntoIter = std::slice::Iter<'a, DetectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
