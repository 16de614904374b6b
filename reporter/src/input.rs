//! @ai:module:intent Load diagnostic records handed over by upstream tools and replay them into a run
//! @ai:module:layer application
//! @ai:module:public_api DiagnosticRecord, RecordSeverity, load_records, parse_records, replay
//! @ai:module:depends_on diagnostic, run, error

use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::run::RunResult;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// @ai:intent Which accumulator operation a record is routed to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordSeverity {
    Console,
    Notice,
    Warning,
    Failure,
    Fatal,
}

/// @ai:intent One serialized diagnostic as written by an upstream tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub file: PathBuf,
    pub start_line: usize,
    #[serde(default)]
    pub end_line: Option<usize>,
    pub message: String,
    pub id: String,
    pub severity: RecordSeverity,
}

impl DiagnosticRecord {
    /// @ai:intent Convert to a diagnostic, validating the line range and flattening newlines
    /// @ai:effects pure
    pub fn to_diagnostic(&self) -> Result<Diagnostic> {
        let end_line = self.end_line.unwrap_or(self.start_line);

        if self.start_line == 0 {
            return Err(Error::InvalidDiagnostic(format!(
                "{} in {}: lines are 1-indexed",
                self.id,
                self.file.display()
            )));
        }

        if end_line < self.start_line {
            return Err(Error::InvalidDiagnostic(format!(
                "{} in {}: end line {} precedes start line {}",
                self.id,
                self.file.display(),
                end_line,
                self.start_line
            )));
        }

        Ok(Diagnostic::new(
            self.file.clone(),
            self.start_line,
            end_line,
            self.id.clone(),
            sanitize_message(&self.message),
        ))
    }
}

/// @ai:intent Collapse line breaks so the message fits on one console line
/// @ai:effects pure
pub fn sanitize_message(message: &str) -> String {
    message
        .split(['\r', '\n'])
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// @ai:intent Parse records from a JSON array or JSON Lines text
/// @ai:effects pure
pub fn parse_records(content: &str) -> Result<Vec<(DiagnosticRecord, Diagnostic)>> {
    let records: Vec<DiagnosticRecord> = if content.trim_start().starts_with('[') {
        serde_json::from_str(content)?
    } else {
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<std::result::Result<_, _>>()?
    };

    records
        .into_iter()
        .map(|record| {
            let diagnostic = record.to_diagnostic()?;
            Ok((record, diagnostic))
        })
        .collect()
}

/// @ai:intent Load records from a file
/// @ai:pre path exists and is readable
/// @ai:effects fs:read
pub fn load_records(path: &Path) -> Result<Vec<(DiagnosticRecord, Diagnostic)>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&content)
}

/// @ai:intent Dispatch records to the run in order, stopping at the first fatal record
/// @ai:post on Err(RunAborted), later records were not logged
/// @ai:effects io, state:write
pub fn replay<W: Write>(records: &[(DiagnosticRecord, Diagnostic)], run: &mut RunResult<W>) -> Result<()> {
    for (record, diagnostic) in records {
        match record.severity {
            RecordSeverity::Console => run.log_console_only(diagnostic),
            RecordSeverity::Notice => run.log_notice(diagnostic),
            RecordSeverity::Warning => run.log_warning(diagnostic),
            RecordSeverity::Failure => run.log_failure(diagnostic),
            RecordSeverity::Fatal => return Err(run.exit_on_failure(diagnostic)),
        }
    }
    Ok(())
}
