//! Error types for report building

use thiserror::Error;

/// Errors raised to the caller for structural misuse or corrupted state.
///
/// Data-quality problems (cells that are not numbers, patch calls that match
/// no section) never show up here; they degrade to plain rendering or a
/// logged no-op.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A row was appended before any table was opened
    #[error("no table exists: open a table before appending rows")]
    NoActiveTable,

    /// A section was closed while none was open
    #[error("no section is open")]
    NoOpenSection,

    /// A handle points at a block of a different kind
    #[error("block {id} is not a {expected} block")]
    MalformedBlockState { id: usize, expected: &'static str },

    /// Both nominal+tolerance and lower+upper columns were configured
    #[error("specify exactly one bound method: nominal+tolerance or lower+upper")]
    ConflictingBounds,

    /// Only one half of a bound method was configured
    #[error("bound method is missing its `{missing}` column")]
    IncompleteBounds { missing: &'static str },

    /// Writing the finished document failed
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// An optional collaborator (plot renderer, notebook display) is not present.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{capability} not available")]
pub struct CapabilityUnavailable {
    pub capability: String,
}

impl CapabilityUnavailable {
    pub fn new(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
