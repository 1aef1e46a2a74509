//! JSON reporter
//!
//! Outputs the full AnalysisReport as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::analysis::AnalysisReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{empty_report, test_report};

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["summary"]["total_detections"], 3);
        assert_eq!(parsed["relevance"]["field"], "relevance");
        assert_eq!(parsed["type"]["rows"][0]["value"], "BLE");
        assert_eq!(parsed["proximity"]["buckets"][0]["bucket"], "VERY_CLOSE");
        assert_eq!(parsed["high_risk"]["total"], 1);
        assert!(parsed.get("mobility").is_none());
    }

    #[test]
    fn test_json_round_trips() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let back: AnalysisReport = serde_json::from_str(&json_str).expect("deserialize report");
        assert_eq!(back, report);
    }

    #[test]
    fn test_json_empty_log() {
        let json_str = render(&empty_report()).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert!(parsed["proximity"]["statistics"].is_null());
        assert_eq!(parsed["category"]["rows"].as_array().expect("rows array").len(), 0);
    }
}
