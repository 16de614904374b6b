//! @ai:module:intent Define the per-line annotation posted with a check run
//! @ai:module:layer domain
//! @ai:module:public_api Annotation
//! @ai:module:stateless true

use crate::diagnostic::{Diagnostic, Severity};
use crate::path::normalize;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent Inline annotation derived from a diagnostic and its severity
///
/// Field names match the check-run API's annotation object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub annotation_level: Severity,
    pub message: String,
}

impl Annotation {
    /// @ai:intent Build an annotation with a normalized path and an `{id}::{message}` body
    /// @ai:effects pure
    pub fn from_diagnostic(diagnostic: &Diagnostic, level: Severity, repo_root: &Path) -> Self {
        Self {
            path: normalize(&diagnostic.file, repo_root),
            start_line: diagnostic.start_line,
            end_line: diagnostic.end_line,
            annotation_level: level,
            message: format!("{}::{}", diagnostic.id, diagnostic.message),
        }
    }
}
