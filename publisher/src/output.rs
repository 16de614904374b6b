//! @ai:module:intent Format the end-of-run summary for humans or machines
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_summary, write_summary
//! @ai:module:depends_on publish, checkrun_core::run
//! @ai:module:stateless true

use crate::publish::PublishOutcome;
use checkrun_core::RunSummary;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    #[serde(flatten)]
    run: &'a RunSummary,
    published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    check_run_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aborted: Option<&'a str>,
}

/// @ai:intent Format the run summary as a string
/// @ai:effects pure
pub fn format_summary(
    summary: &RunSummary,
    outcome: Option<&PublishOutcome>,
    aborted: Option<&str>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Json => {
            let (published, check_run_url) = match outcome {
                Some(PublishOutcome::Published { html_url, .. }) => (true, html_url.as_deref()),
                _ => (false, None),
            };
            let document = SummaryDocument {
                run: summary,
                published,
                check_run_url,
                aborted,
            };
            let mut json = serde_json::to_string_pretty(&document).unwrap_or_default();
            json.push('\n');
            json
        }
        OutputFormat::Text => format_summary_text(summary, outcome, aborted),
    }
}

/// @ai:intent Write a rendered summary to a file, or to stderr when no file is given
/// @ai:post nothing is written to stdout
/// @ai:effects fs:write, io
pub fn write_summary(rendered: &str, summary_file: Option<&Path>) -> std::io::Result<()> {
    match summary_file {
        Some(path) => std::fs::write(path, rendered),
        None => {
            eprint!("{}", rendered);
            Ok(())
        }
    }
}

/// @ai:intent Format the run summary as colored text
/// @ai:effects pure
fn format_summary_text(
    summary: &RunSummary,
    outcome: Option<&PublishOutcome>,
    aborted: Option<&str>,
) -> String {
    let mut output = String::new();

    if let Some(reason) = aborted {
        output.push_str(&format!("{} {}\n", "ABORTED".red().bold(), reason));
    }

    let status = if summary.success {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };

    output.push_str(&format!(
        "{} {}: {} failures, {} warnings, {} notices\n",
        status,
        summary.tool_name.bold(),
        summary.failures.to_string().red(),
        summary.warnings.to_string().yellow(),
        summary.notices
    ));

    match outcome {
        Some(PublishOutcome::Published { id, html_url }) => {
            let target = html_url.clone().unwrap_or_else(|| format!("#{}", id));
            output.push_str(&format!("{} {}\n", "published:".cyan(), target));
        }
        Some(PublishOutcome::Skipped { reason }) => {
            output.push_str(&format!("{} {}\n", "not published:".yellow(), reason));
        }
        None => output.push_str(&format!("{}\n", "not published (dry run)".dimmed())),
    }

    output
}
