//! @ai:module:intent Diagnostic aggregation library for CI check reporting
//! @ai:module:layer domain
//! @ai:module:public_api annotation, console, diagnostic, error, input, path, run
//! @ai:module:stateless false
//!
//! # checkrun-core
//!
//! Collects diagnostics reported by upstream checks, writes each one as a
//! single CI log line, and keeps the ordered annotation list and overall
//! success flag that a check run is published from.
//!
//! ## Example
//!
//! ```rust
//! use checkrun_core::{Diagnostic, RunResult};
//!
//! let mut run = RunResult::with_writer("/repo", "Lint", Vec::new());
//! run.log_warning(&Diagnostic::at_line("/repo/src/x.cs", 3, "W001", "trailing space"));
//! run.log_failure(&Diagnostic::at_line("/repo/src/x.cs", 10, "E001", "bad token"));
//!
//! assert!(!run.success());
//! assert_eq!(run.annotations().len(), 2);
//! ```

pub mod annotation;
pub mod console;
pub mod diagnostic;
pub mod error;
pub mod input;
pub mod path;
pub mod run;

pub use annotation::Annotation;
pub use console::{format_line, ConsoleReporter};
pub use diagnostic::{Diagnostic, Severity};
pub use error::{Error, Result};
pub use input::{load_records, parse_records, replay, DiagnosticRecord, RecordSeverity};
pub use path::{absolute_root, clean, normalize};
pub use run::{RunResult, RunSummary};
