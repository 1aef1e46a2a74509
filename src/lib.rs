//! ouispy-analyzer - statistics for surveillance-device detection logs
//!
//! Turns the CSV log written by a passive BLE/WiFi scanning appliance into a
//! deterministic report: categorical breakdowns, a manufacturer ranking, RSSI
//! statistics with proximity buckets, the HIGH relevance sightings and a
//! grouped summary CSV.
//!
//! The [`analysis`] engine is pure; [`ingest`], [`reporters`] and the CLI
//! handle files and the terminal.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod ingest;
pub mod models;
pub mod reporters;
