//! testlog: incremental HTML test reports
//!
//! A [`ReportBuilder`] collects banner items, sections, tables, text lines and
//! figures one call at a time, then serializes them into a single
//! self-contained HTML document with a light/dark theme toggle and
//! collapsible sections.
//!
//! Two things make the builder more than a string concatenator:
//!
//! * tables stay open for row injection, and each row is checked against the
//!   table's spec columns (see [`evaluate`]);
//! * sections keep a status badge and progress bar that can be patched after
//!   the section was emitted, through the [`SectionHandle`] returned when it
//!   was opened.
//!
//! The builder is plain single-threaded state. Sharing one across threads
//! requires external synchronization by the caller.

pub mod builder;
pub mod config;
pub mod display;
pub mod error;
pub mod evaluate;
pub mod image;
pub mod reporter;

pub use builder::{
    ReportBuilder, ReportOptions, ReportSummary, SectionHandle, TableHandle, TableSpec,
};
pub use error::{CapabilityUnavailable, ReportError, Result};
pub use evaluate::{evaluate, Evaluation, HeaderIndex, SpecColumns};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status shown on a section badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    /// Initial state of every opened section
    #[default]
    Running,
    Pass,
    Fail,
    Warning,
    /// Informational section without a verdict
    Data,
    Default,
}

impl SectionStatus {
    pub const ALL: [SectionStatus; 6] = [
        SectionStatus::Running,
        SectionStatus::Pass,
        SectionStatus::Fail,
        SectionStatus::Warning,
        SectionStatus::Data,
        SectionStatus::Default,
    ];

    /// CSS token used in `status-*` and `category-*` classes
    pub fn as_str(self) -> &'static str {
        match self {
            SectionStatus::Running => "running",
            SectionStatus::Pass => "pass",
            SectionStatus::Fail => "fail",
            SectionStatus::Warning => "warning",
            SectionStatus::Data => "data",
            SectionStatus::Default => "default",
        }
    }

    /// Badge text
    pub fn label(self) -> &'static str {
        match self {
            SectionStatus::Running => "RUNNING",
            SectionStatus::Pass => "PASS",
            SectionStatus::Fail => "FAIL",
            SectionStatus::Warning => "WARNING",
            SectionStatus::Data => "DATA",
            SectionStatus::Default => "INFO",
        }
    }
}

impl std::fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SectionStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown section status: {s}"))
    }
}

/// Emphasis for a single text line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStatus {
    Pass,
    Fail,
    Warning,
}

impl LineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LineStatus::Pass => "pass",
            LineStatus::Fail => "fail",
            LineStatus::Warning => "warning",
        }
    }
}

/// Color scheme of the rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
