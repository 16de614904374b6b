//! @ai:module:intent Render diagnostics as single-line CI log entries
//! @ai:module:layer infrastructure
//! @ai:module:public_api ConsoleReporter, format_line
//! @ai:module:depends_on path, diagnostic
//! @ai:module:stateless false

use crate::diagnostic::Diagnostic;
use crate::path::{absolute_root, normalize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// @ai:intent Format a diagnostic as `{glyph}{tool}-{id}::file={path},line={start}::{message}`
/// @ai:pre message contains no newline
/// @ai:effects pure
/// @ai:edge_cases end_line is intentionally not part of the line
pub fn format_line(glyph: &str, tool_name: &str, diagnostic: &Diagnostic, repo_root: &Path) -> String {
    format!(
        "{}{}-{}::file={},line={}::{}",
        glyph,
        tool_name,
        diagnostic.id,
        normalize(&diagnostic.file, repo_root),
        diagnostic.start_line,
        diagnostic.message
    )
}

/// @ai:intent Writes log lines for one tool to an output sink
pub struct ConsoleReporter<W: Write> {
    out: W,
    tool_name: String,
    repo_root: PathBuf,
}

impl<W: Write> ConsoleReporter<W> {
    /// @ai:intent Create a reporter writing to the given sink
    /// @ai:post repo_root is stored in absolute, cleaned form
    /// @ai:effects env
    pub fn new(out: W, tool_name: impl Into<String>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            out,
            tool_name: tool_name.into(),
            repo_root: absolute_root(&repo_root.into()),
        }
    }

    /// @ai:intent Write one diagnostic line
    /// @ai:effects io
    pub fn write_line(&mut self, glyph: &str, diagnostic: &Diagnostic) {
        let line = format_line(glyph, &self.tool_name, diagnostic, &self.repo_root);
        self.emit(&line);
    }

    /// @ai:intent Write a tool-level message that is not tied to a file
    /// @ai:effects io
    pub fn write_message(&mut self, glyph: &str, message: &str) {
        let line = format!("{}{}::{}", glyph, self.tool_name, message);
        self.emit(&line);
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    // Output stream is treated as always available.
    fn emit(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
        let _ = self.out.flush();
    }
}
