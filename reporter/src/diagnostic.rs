//! @ai:module:intent Define the diagnostic record supplied by upstream checks
//! @ai:module:layer domain
//! @ai:module:public_api Diagnostic, Severity
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Escalation level of a reported diagnostic
///
/// Serialized with the annotation level names the check-run API expects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Notice,
    Warning,
    Failure,
}

impl Severity {
    /// @ai:intent Get the API string for this level
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Failure => "failure",
        }
    }

    /// @ai:intent Get the console prefix glyph for this level
    /// @ai:effects pure
    pub fn glyph(&self) -> &'static str {
        match self {
            Severity::Notice => "",
            Severity::Warning => "⚠️",
            Severity::Failure => "❌",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// @ai:intent One issue found by an upstream tool, before formatting
/// @ai:invariant start_line >= 1 and end_line >= start_line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub message: String,
    pub id: String,
}

impl Diagnostic {
    /// @ai:intent Create a diagnostic spanning a line range
    /// @ai:pre end_line >= start_line
    /// @ai:effects pure
    pub fn new(
        file: impl Into<PathBuf>,
        start_line: usize,
        end_line: usize,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            start_line,
            end_line,
            message: message.into(),
            id: id.into(),
        }
    }

    /// @ai:intent Create a diagnostic for a single line
    /// @ai:effects pure
    pub fn at_line(
        file: impl Into<PathBuf>,
        line: usize,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(file, line, line, id, message)
    }
}
