//! Machine-readable digest of a report's verdicts

use crate::SectionStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub title: String,
    pub status: SectionStatus,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rows: usize,
    pub evaluated: usize,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub sections: Vec<SectionSummary>,
    pub tables: Vec<TableSummary>,
}

impl ReportSummary {
    /// Rows whose measured value fell outside its bounds, across all tables
    pub fn failed_rows(&self) -> usize {
        self.tables.iter().map(|t| t.failed).sum()
    }

    pub fn failed_sections(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.status == SectionStatus::Fail)
            .count()
    }

    /// No failed section and no failed row
    pub fn is_passing(&self) -> bool {
        self.failed_rows() == 0 && self.failed_sections() == 0
    }
}
