//! Shared data models: diagnostic records and the report built from them.

pub mod report;

pub use report::{Report, ReportView};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a single diagnostic.
///
/// `Fatal` means the engine could not complete analysis (bad config,
/// unreadable source). It is not a lint finding and is never counted as
/// an error or a warning.
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub fn is_fatal(self) -> bool {
        matches!(self, Severity::Fatal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A single finding produced by the lint engine.
///
/// `line` and `column` are 1-based; records not tied to a source position
/// use 0 for both.
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub file_path: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        file_path: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            file_path: file_path.into(),
            line,
            column,
        }
    }

    /// Shorthand for a fatal record that is not tied to a source position.
    pub fn fatal(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self::new(rule_id, Severity::Fatal, message, file_path, 0, 0)
    }
}
