//! JSON reporter for machine-readable output

use crate::builder::ReportSummary;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a summary as JSON, with the overall verdict attached
    pub fn report(&self, summary: &ReportSummary) -> String {
        let output = JsonOutput {
            summary,
            passing: summary.is_passing(),
            failed_rows: summary.failed_rows(),
            failed_sections: summary.failed_sections(),
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    #[serde(flatten)]
    summary: &'a ReportSummary,
    passing: bool,
    failed_rows: usize,
    failed_sections: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{SectionSummary, TableSummary};
    use crate::SectionStatus;

    #[test]
    fn test_report_shape() {
        let summary = ReportSummary {
            title: "Bench".into(),
            version: None,
            sections: vec![SectionSummary {
                title: "Power".into(),
                status: SectionStatus::Fail,
                progress: 100,
            }],
            tables: vec![TableSummary {
                title: None,
                rows: 2,
                evaluated: 2,
                passed: 2,
                failed: 0,
            }],
        };
        let json = JsonReporter::new().report(&summary);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Bench");
        assert!(value.get("version").is_none());
        assert_eq!(value["sections"][0]["status"], "fail");
        assert_eq!(value["tables"][0]["passed"], 2);
        assert!(value["tables"][0].get("title").is_none());
        assert_eq!(value["passing"], false);
        assert_eq!(value["failedSections"], 1);
        assert_eq!(value["failedRows"], 0);
    }

    #[test]
    fn test_pretty_is_multiline() {
        let summary = ReportSummary {
            title: "Empty".into(),
            version: None,
            sections: vec![],
            tables: vec![],
        };
        assert!(JsonReporter::new().pretty().report(&summary).contains('\n'));
        assert!(!JsonReporter::new().report(&summary).contains('\n'));
    }
}
