//! Detection log ingestion
//!
//! Reads the CSV log written by the scanning appliance into a [`RecordTable`].
//! Two layouts are accepted, matched on header names (case-insensitive):
//!
//! - the minimal 9-column export:
//!   `Timestamp,MAC,Manufacturer,Category,Relevance,Deployment,RSSI,Type,Notes`
//! - the appliance's 20-column log, which adds `SessionID`, `UnixTime`, `OUI`,
//!   `RSSIMin`, `RSSIMax`, `RSSIAvg`, `SeenCount`, `FirstSeen`, `LastSeen`,
//!   `Duration` and `IsStationary`
//!
//! The appliance writes `Notes` unquoted as the final column, so rows with
//! more fields than the header have their trailing fields re-joined.

use crate::analysis::AnalysisError;
use crate::models::{ApplianceFields, DetectionRecord, RecordTable};
use csv::StringRecord;
use rustc_hash::FxHashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Columns that must be present in every log
const REQUIRED_COLUMNS: &[&str] = &[
    "timestamp",
    "mac",
    "manufacturer",
    "category",
    "relevance",
    "rssi",
    "type",
];

/// Errors that can occur while reading a detection log
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Schema error on line {line}, column '{column}': {reason}")]
    Schema {
        line: u64,
        column: String,
        reason: String,
    },

    #[error(transparent)]
    Table(#[from] AnalysisError),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Load a detection log from disk.
pub fn read_detections(path: &Path) -> IngestResult<RecordTable> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let table = read_detections_from(file)?;
    info!("Loaded {} detections from {}", table.len(), path.display());
    Ok(table)
}

/// Parse a detection log from any reader.
pub fn read_detections_from<R: Read>(reader: R) -> IngestResult<RecordTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    debug!(
        "Log has {} columns (extended format: {})",
        columns.width,
        columns.is_extended()
    );

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        // Blank lines at the end of a log are common after a power cut
        if row.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        records.push(columns.parse_row(&row)?);
    }

    Ok(RecordTable::new(records)?)
}

/// Normalize a hardware address: uppercase, `-` separators become `:`.
pub fn normalize_mac(mac: &str) -> String {
    mac.trim().to_uppercase().replace('-', ":")
}

/// Vendor prefix (first three octets) of a normalized MAC.
pub fn extract_oui(mac: &str) -> Option<String> {
    mac.get(..8).map(str::to_string)
}

/// Header name -> column index
struct Columns {
    index: FxHashMap<String, usize>,
    width: usize,
    notes_is_last: bool,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> IngestResult<Self> {
        let index: FxHashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        for column in REQUIRED_COLUMNS {
            if !index.contains_key(*column) {
                return Err(IngestError::MissingColumn((*column).to_string()));
            }
        }

        let width = headers.len();
        let notes_is_last = index.get("notes") == Some(&(width - 1));
        Ok(Self {
            index,
            width,
            notes_is_last,
        })
    }

    fn is_extended(&self) -> bool {
        self.index.contains_key("sessionid") || self.index.contains_key("isstationary")
    }

    fn raw<'r>(&self, row: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.index
            .get(column)
            .and_then(|&i| row.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn required<'r>(&self, row: &'r StringRecord, column: &str) -> IngestResult<&'r str> {
        self.raw(row, column).ok_or_else(|| schema(row, column, "value is missing"))
    }

    fn parsed<T>(&self, row: &StringRecord, column: &str) -> IngestResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.raw(row, column)
            .map(|v| v.parse::<T>().map_err(|e| schema(row, column, &format!("'{}': {}", v, e))))
            .transpose()
    }

    fn notes(&self, row: &StringRecord) -> String {
        if self.notes_is_last && row.len() > self.width {
            let fields: Vec<&str> = row.iter().skip(self.width - 1).collect();
            warn!(
                "Line {}: {} extra fields, folding them into Notes",
                line_of(row),
                row.len() - self.width
            );
            return fields.join(",").trim().to_string();
        }
        self.raw(row, "notes").unwrap_or_default().to_string()
    }

    fn parse_row(&self, row: &StringRecord) -> IngestResult<DetectionRecord> {
        if row.len() < self.width && !self.notes_is_last {
            return Err(schema(
                row,
                "*",
                &format!("expected {} fields, found {}", self.width, row.len()),
            ));
        }

        let timestamp = self
            .parsed::<i64>(row, "timestamp")?
            .ok_or_else(|| schema(row, "timestamp", "value is missing"))?;
        let rssi = self
            .parsed::<i32>(row, "rssi")?
            .ok_or_else(|| schema(row, "rssi", "value is missing"))?;
        let relevance = self
            .parsed(row, "relevance")?
            .ok_or_else(|| schema(row, "relevance", "value is missing"))?;
        let kind = self
            .parsed(row, "type")?
            .ok_or_else(|| schema(row, "type", "value is missing"))?;

        let mac = normalize_mac(self.required(row, "mac")?);
        let mut record = DetectionRecord::new(
            timestamp,
            mac,
            self.required(row, "manufacturer")?,
            self.required(row, "category")?,
            relevance,
            rssi,
        )
        .with_deployment(self.raw(row, "deployment").unwrap_or("Unknown"))
        .with_kind(kind)
        .with_notes(self.notes(row));

        if self.is_extended() {
            let extended = self.appliance_fields(row, &record.mac)?;
            record = record.with_extended(extended);
        }
        Ok(record)
    }

    fn appliance_fields(&self, row: &StringRecord, mac: &str) -> IngestResult<ApplianceFields> {
        Ok(ApplianceFields {
            session_id: self.raw(row, "sessionid").map(str::to_string),
            unix_time: self.parsed(row, "unixtime")?,
            oui: self
                .raw(row, "oui")
                .map(|o| o.to_uppercase())
                .or_else(|| extract_oui(mac)),
            rssi_min: self.parsed(row, "rssimin")?,
            rssi_max: self.parsed(row, "rssimax")?,
            rssi_avg: self.parsed(row, "rssiavg")?,
            seen_count: self.parsed(row, "seencount")?,
            first_seen: self.parsed(row, "firstseen")?,
            last_seen: self.parsed(row, "lastseen")?,
            duration_ms: self.parsed(row, "duration")?,
            mobility: self.parsed(row, "isstationary")?,
        })
    }
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or(0)
}

fn schema(row: &StringRecord, column: &str, reason: &str) -> IngestError {
    IngestError::Schema {
        line: line_of(row),
        column: column.to_string(),
        reason: reason.to_string(),
    }
}
