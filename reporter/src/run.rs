//! @ai:module:intent Accumulate annotations and the overall success flag for one check run
//! @ai:module:layer application
//! @ai:module:public_api RunResult, RunSummary
//! @ai:module:depends_on console, annotation, diagnostic, error
//! @ai:module:stateless false

use crate::annotation::Annotation;
use crate::console::ConsoleReporter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::error::Error;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// @ai:intent Process-lifetime accumulation state for a single check run
/// @ai:invariant annotations are kept in call order and never removed
/// @ai:invariant success is false iff at least one failure was logged
///
/// Owned by the caller and passed explicitly; one instance per run.
pub struct RunResult<W: Write = std::io::Stdout> {
    console: ConsoleReporter<W>,
    annotations: Vec<Annotation>,
    success: bool,
}

/// @ai:intent Serializable snapshot of a run for reporting
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool_name: String,
    pub success: bool,
    pub notices: usize,
    pub warnings: usize,
    pub failures: usize,
    pub annotations: Vec<Annotation>,
}

impl RunResult<std::io::Stdout> {
    /// @ai:intent Start a run that logs to standard output
    /// @ai:effects env
    pub fn new(repo_root: impl Into<PathBuf>, tool_name: impl Into<String>) -> Self {
        Self::with_writer(repo_root, tool_name, std::io::stdout())
    }
}

impl<W: Write> RunResult<W> {
    /// @ai:intent Start a run that logs to the given sink; a relative root is resolved against the working directory
    /// @ai:effects env
    pub fn with_writer(repo_root: impl Into<PathBuf>, tool_name: impl Into<String>, out: W) -> Self {
        Self {
            console: ConsoleReporter::new(out, tool_name, repo_root),
            annotations: Vec::new(),
            success: true,
        }
    }

    /// @ai:intent Log a diagnostic to the console without recording an annotation
    /// @ai:effects io
    pub fn log_console_only(&mut self, diagnostic: &Diagnostic) {
        self.console.write_line(Severity::Notice.glyph(), diagnostic);
    }

    /// @ai:intent Log and record a notice
    /// @ai:effects io, state:write
    pub fn log_notice(&mut self, diagnostic: &Diagnostic) {
        self.record(diagnostic, Severity::Notice);
    }

    /// @ai:intent Log and record a warning
    /// @ai:effects io, state:write
    pub fn log_warning(&mut self, diagnostic: &Diagnostic) {
        self.record(diagnostic, Severity::Warning);
    }

    /// @ai:intent Log and record a failure, marking the run as failed
    /// @ai:effects io, state:write
    /// @ai:idempotent true
    pub fn log_failure(&mut self, diagnostic: &Diagnostic) {
        self.record(diagnostic, Severity::Failure);
        self.success = false;
    }

    /// @ai:intent Record a failure and produce the abort error the caller must return
    /// @ai:post success() == false
    /// @ai:effects io, state:write
    ///
    /// ```
    /// # use checkrun_core::{Diagnostic, Error, RunResult};
    /// fn check(run: &mut RunResult<Vec<u8>>) -> Result<(), Error> {
    ///     let diagnostic = Diagnostic::at_line("/repo/toc.md", 1, "TOC00", "unreadable");
    ///     Err(run.exit_on_failure(&diagnostic))
    /// }
    /// let mut run = RunResult::with_writer("/repo", "Toc", Vec::new());
    /// assert!(check(&mut run).unwrap_err().is_abort());
    /// ```
    #[must_use = "the abort error must be returned to stop the check sequence"]
    pub fn exit_on_failure(&mut self, diagnostic: &Diagnostic) -> Error {
        self.log_failure(diagnostic);
        Error::RunAborted {
            message: diagnostic.message.clone(),
        }
    }

    /// @ai:intent Write a tool-level warning line that is not recorded as an annotation
    /// @ai:effects io
    pub fn warn_console(&mut self, message: &str) {
        self.console.write_message(Severity::Warning.glyph(), message);
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn tool_name(&self) -> &str {
        self.console.tool_name()
    }

    pub fn repo_root(&self) -> &Path {
        self.console.repo_root()
    }

    pub fn writer(&self) -> &W {
        self.console.writer()
    }

    /// @ai:intent Count recorded annotations at a given level
    /// @ai:effects pure
    pub fn count(&self, level: Severity) -> usize {
        self.annotations
            .iter()
            .filter(|a| a.annotation_level == level)
            .count()
    }

    /// @ai:intent Snapshot the run for JSON output
    /// @ai:effects pure
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            tool_name: self.tool_name().to_string(),
            success: self.success,
            notices: self.count(Severity::Notice),
            warnings: self.count(Severity::Warning),
            failures: self.count(Severity::Failure),
            annotations: self.annotations.clone(),
        }
    }

    fn record(&mut self, diagnostic: &Diagnostic, level: Severity) {
        self.console.write_line(level.glyph(), diagnostic);
        let annotation = Annotation::from_diagnostic(diagnostic, level, self.console.repo_root());
        self.annotations.push(annotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> RunResult<Vec<u8>> {
        RunResult::with_writer("/repo", "Lint", Vec::new())
    }

    fn diag(name: &str) -> Diagnostic {
        Diagnostic::at_line(format!("/repo/{}.md", name), 1, name.to_uppercase(), "msg")
    }

    fn output(run: &RunResult<Vec<u8>>) -> String {
        String::from_utf8(run.writer().clone()).unwrap()
    }

    #[test]
    fn test_notices_and_warnings_keep_success() {
        let mut run = run();
        run.log_notice(&diag("a"));
        run.log_warning(&diag("b"));
        run.log_notice(&diag("c"));

        assert!(run.success());
        let levels: Vec<_> = run.annotations().iter().map(|a| a.annotation_level).collect();
        assert_eq!(levels, vec![Severity::Notice, Severity::Warning, Severity::Notice]);
    }

    #[test]
    fn test_failure_is_sticky() {
        let mut run = run();
        run.log_failure(&diag("a"));
        run.log_notice(&diag("b"));
        run.log_warning(&diag("c"));
        run.log_failure(&diag("d"));

        assert!(!run.success());
        assert_eq!(run.annotations().len(), 4);
    }

    #[test]
    fn test_annotation_order_matches_call_order() {
        let mut run = run();
        run.log_failure(&diag("a"));
        run.log_warning(&diag("b"));
        run.log_notice(&diag("c"));

        let paths: Vec<_> = run.annotations().iter().map(|a| a.path.as_str()).collect();
        let levels: Vec<_> = run.annotations().iter().map(|a| a.annotation_level).collect();
        assert_eq!(paths, vec!["a.md", "b.md", "c.md"]);
        assert_eq!(levels, vec![Severity::Failure, Severity::Warning, Severity::Notice]);
    }

    #[test]
    fn test_console_only_adds_no_annotation() {
        let mut run = run();
        for _ in 0..5 {
            run.log_console_only(&diag("a"));
        }

        assert!(run.annotations().is_empty());
        assert!(run.success());
        assert_eq!(output(&run).lines().count(), 5);
        assert!(output(&run).starts_with("Lint-A::file=a.md,line=1::msg"));
    }

    #[test]
    fn test_console_lines_carry_glyphs() {
        let mut run = run();
        run.log_notice(&diag("a"));
        run.log_warning(&diag("b"));
        run.log_failure(&diag("c"));

        let text = output(&run);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Lint-A::file=a.md,line=1::msg");
        assert_eq!(lines[1], "⚠️Lint-B::file=b.md,line=1::msg");
        assert_eq!(lines[2], "❌Lint-C::file=c.md,line=1::msg");
    }

    #[test]
    fn test_exit_on_failure_records_and_aborts() {
        let mut run = run();
        let diagnostic = Diagnostic::at_line("/repo/x.md", 2, "F1", "cannot continue");
        let error = run.exit_on_failure(&diagnostic);

        assert!(!run.success());
        assert_eq!(run.annotations().len(), 1);
        assert!(matches!(error, Error::RunAborted { ref message } if message == "cannot continue"));
    }

    #[test]
    fn test_relative_root_yields_repository_paths() {
        let cwd = std::env::current_dir().unwrap();
        let mut run = RunResult::with_writer(".", "Lint", Vec::new());
        run.log_failure(&Diagnostic::at_line(cwd.join("src/x.cs"), 10, "E001", "bad token"));

        assert!(run.repo_root().is_absolute());
        assert_eq!(run.annotations()[0].path, "src/x.cs");
        assert_eq!(output(&run), "❌Lint-E001::file=src/x.cs,line=10::bad token\n");
    }

    #[test]
    fn test_summary_counts() {
        let mut run = run();
        run.log_notice(&diag("a"));
        run.log_failure(&diag("b"));
        run.log_failure(&diag("c"));

        let summary = run.summary();
        assert_eq!(summary.notices, 1);
        assert_eq!(summary.warnings, 0);
        assert_eq!(summary.failures, 2);
        assert!(!summary.success);
    }
}
