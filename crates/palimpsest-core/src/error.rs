//! Engine error types and machine-readable error codes.

use crate::dialect::STARTING_INDEX;
use serde::Serialize;
use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidWorkItem,
    DuplicateNumber,
    IndexBelowMinimum,
    WorkItemNotFound,
    SourceStoreFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidWorkItem => "E1001",
            Self::DuplicateNumber => "E2001",
            Self::IndexBelowMinimum => "E2002",
            Self::WorkItemNotFound => "E2003",
            Self::SourceStoreFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidWorkItem => "Malformed work item header line",
            Self::DuplicateNumber => "Work item number already present",
            Self::IndexBelowMinimum => "Modification index below starting index",
            Self::WorkItemNotFound => "Work item not found",
            Self::SourceStoreFailed => "Source load/store failed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidWorkItem => {
                Some("Fix or remove the malformed header line, then rescan the member.")
            }
            Self::DuplicateNumber => Some("Use a ticket number not already in the header block."),
            Self::IndexBelowMinimum => Some("Let the engine assign the next index automatically."),
            Self::WorkItemNotFound => None,
            Self::SourceStoreFailed => Some("Check the member exists and is readable/writable."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Header parse failures
// ---------------------------------------------------------------------------

/// The numeric header field that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderField {
    Index,
    Date,
    Number,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Index => "index",
            Self::Date => "date",
            Self::Number => "number",
        };
        write!(f, "{name}")
    }
}

/// A line that looked like a work item header but does not parse.
///
/// Non-fatal during a scan: the engine logs it, records it in the scan
/// report, and keeps walking. The member path is carried for reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid work item header in {member}: {field} field is not numeric: '{raw}'")]
pub struct InvalidWorkItem {
    /// Qualified member the line came from.
    pub member: String,
    /// Which field failed.
    pub field: HeaderField,
    /// The raw field text that did not parse.
    pub raw: String,
}

// ---------------------------------------------------------------------------
// Mutation failures
// ---------------------------------------------------------------------------

/// Recoverable failures of change-log mutations.
///
/// Every variant leaves the member buffer and registry untouched.
/// Out-of-range registry access is deliberately *not* represented here: that
/// is a programmer error and panics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChangeLogError {
    /// The ticket number is already bound to a work item in this member.
    #[error("work item {number} already exists in {member}")]
    DuplicateNumber {
        /// Qualified member name.
        member: String,
        /// The rejected ticket number.
        number: i64,
    },

    /// The caller supplied a modification index below [`STARTING_INDEX`].
    #[error("modification index {index} is below the starting index {STARTING_INDEX}")]
    IndexBelowMinimum {
        /// The rejected index.
        index: u32,
    },

    /// No work item with this ticket number exists in the member.
    #[error("work item {number} not found in {member}")]
    NotFound {
        /// Qualified member name.
        member: String,
        /// The number that was looked up.
        number: i64,
    },
}

impl ChangeLogError {
    /// The stable error code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::DuplicateNumber { .. } => ErrorCode::DuplicateNumber,
            Self::IndexBelowMinimum { .. } => ErrorCode::IndexBelowMinimum,
            Self::NotFound { .. } => ErrorCode::WorkItemNotFound,
        }
    }
}
