//! @ai:module:intent Build and submit the aggregated check run for a finished run
//! @ai:module:layer application
//! @ai:module:public_api CheckRunPublisher, PublishOutcome, build_request, summary_text
//! @ai:module:depends_on client, checkrun_core::run
//! @ai:module:stateless true

use crate::client::{ApiError, CheckRunClient, CheckRunOutput, CheckRunRequest};
use checkrun_core::RunResult;
use std::io::Write;

/// @ai:intent Result of a publish attempt that did not propagate an error
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Published { id: u64, html_url: Option<String> },
    /// The credentials could not create a check run; the run outcome is unchanged.
    Skipped { reason: String },
}

/// @ai:intent Human-readable summary line embedding tool, pass/fail and annotation count
/// @ai:effects pure
pub fn summary_text(tool_name: &str, success: bool, annotation_count: usize) -> String {
    format!(
        "{} {} with {} annotation{}",
        tool_name,
        if success { "passed" } else { "failed" },
        annotation_count,
        if annotation_count == 1 { "" } else { "s" }
    )
}

/// @ai:intent Build the check-run creation request from the accumulated run
/// @ai:post request.output.annotations equals run.annotations() in order
/// @ai:effects time
pub fn build_request<W: Write>(run: &RunResult<W>, head_sha: &str, title: &str) -> CheckRunRequest {
    let annotations = run.annotations().to_vec();

    CheckRunRequest {
        name: run.tool_name().to_string(),
        head_sha: head_sha.to_string(),
        status: "completed",
        conclusion: if run.success() { "success" } else { "failure" },
        completed_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        output: CheckRunOutput {
            title: title.to_string(),
            summary: summary_text(run.tool_name(), run.success(), annotations.len()),
            annotations,
        },
    }
}

/// @ai:intent Publishes a run through an injected check-run client
pub struct CheckRunPublisher<C: CheckRunClient> {
    client: C,
    title: Option<String>,
}

impl<C: CheckRunClient> CheckRunPublisher<C> {
    /// @ai:intent Create a publisher around a client capability
    /// @ai:effects pure
    pub fn new(client: C) -> Self {
        Self { client, title: None }
    }

    /// @ai:intent Override the check-run output title
    /// @ai:effects pure
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// @ai:intent Submit the run as a single check run; at most one attempt
    /// @ai:post run.success() is unchanged
    /// @ai:effects network, io
    /// @ai:edge_cases authorization denial is logged as a warning and returns Skipped
    pub async fn publish<W: Write>(
        &self,
        run: &mut RunResult<W>,
        owner: &str,
        repo: &str,
        head_sha: &str,
    ) -> Result<PublishOutcome, ApiError> {
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!("{} results", run.tool_name()));
        let request = build_request(run, head_sha, &title);

        tracing::info!(
            "Publishing check run '{}' for {}/{}@{} ({} annotations, conclusion {})",
            request.name,
            owner,
            repo,
            head_sha,
            request.output.annotations.len(),
            request.conclusion
        );

        match self.client.create_check_run(owner, repo, &request).await {
            Ok(created) => {
                tracing::info!("Created check run {}", created.id);
                Ok(PublishOutcome::Published {
                    id: created.id,
                    html_url: created.html_url,
                })
            }
            Err(err) if err.is_authorization_denied() => {
                let reason = err.to_string();
                tracing::warn!("Check run not published: {}", reason);
                run.warn_console(&format!("Unable to publish check run results: {}", reason));
                Ok(PublishOutcome::Skipped { reason })
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockCheckRunClient, MockResponse};
    use checkrun_core::{Diagnostic, Severity};
    use pretty_assertions::assert_eq;

    fn sample_run() -> RunResult<Vec<u8>> {
        let mut run = RunResult::with_writer("/repo", "Lint", Vec::new());
        run.log_failure(&Diagnostic::at_line("/repo/a.md", 1, "A", "first"));
        run.log_warning(&Diagnostic::new("/repo/b.md", 2, 4, "B", "second"));
        run.log_notice(&Diagnostic::at_line("/repo/c.md", 3, "C", "third"));
        run
    }

    fn console(run: &RunResult<Vec<u8>>) -> String {
        String::from_utf8(run.writer().clone()).unwrap()
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(summary_text("Lint", true, 0), "Lint passed with 0 annotations");
        assert_eq!(summary_text("Lint", false, 1), "Lint failed with 1 annotation");
    }

    #[test]
    fn test_build_request_carries_run() {
        let run = sample_run();
        let request = build_request(&run, "deadbeef", "Lint results");

        assert_eq!(request.name, "Lint");
        assert_eq!(request.head_sha, "deadbeef");
        assert_eq!(request.status, "completed");
        assert_eq!(request.conclusion, "failure");
        assert_eq!(request.output.summary, "Lint failed with 3 annotations");
        assert_eq!(request.output.annotations, run.annotations().to_vec());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["output"]["annotations"][1]["annotation_level"], "warning");
        assert_eq!(json["output"]["annotations"][1]["end_line"], 4);
        assert_eq!(json["output"]["annotations"][0]["message"], "A::first");
    }

    #[test]
    fn test_build_request_success_conclusion() {
        let mut run = RunResult::with_writer("/repo", "Lint", Vec::new());
        run.log_notice(&Diagnostic::at_line("/repo/a.md", 1, "A", "fine"));

        let request = build_request(&run, "sha", "t");
        assert_eq!(request.conclusion, "success");
        assert_eq!(request.output.annotations[0].annotation_level, Severity::Notice);
    }

    #[tokio::test]
    async fn test_publish_success() {
        let publisher = CheckRunPublisher::new(MockCheckRunClient::new()).with_title("Docs lint");
        let mut run = sample_run();

        let outcome = publisher.publish(&mut run, "dotnet", "csharpstandard", "abc").await.unwrap();

        assert!(matches!(outcome, PublishOutcome::Published { id: 1, .. }));
        let requests = publisher.client().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "dotnet");
        assert_eq!(requests[0].1, "csharpstandard");
        assert_eq!(requests[0].2.output.title, "Docs lint");
    }

    #[tokio::test]
    async fn test_publish_authorization_denied_is_downgraded() {
        let publisher = CheckRunPublisher::new(MockCheckRunClient::failing(403));
        let mut run = sample_run();
        let lines_before = console(&run).lines().count();

        let outcome = publisher.publish(&mut run, "fork", "repo", "abc").await.unwrap();

        assert!(matches!(outcome, PublishOutcome::Skipped { .. }));
        assert!(!run.success());
        assert_eq!(run.annotations().len(), 3);

        let output = console(&run);
        assert_eq!(output.lines().count(), lines_before + 1);
        let last = output.lines().last().unwrap();
        assert!(last.starts_with("⚠️Lint::Unable to publish check run results"));
    }

    #[tokio::test]
    async fn test_publish_denied_keeps_success_true() {
        let publisher = CheckRunPublisher::new(MockCheckRunClient::failing(403));
        let mut run = RunResult::with_writer("/repo", "Lint", Vec::new());

        let outcome = publisher.publish(&mut run, "o", "r", "abc").await.unwrap();

        assert!(matches!(outcome, PublishOutcome::Skipped { .. }));
        assert!(run.success());
    }

    #[tokio::test]
    async fn test_publish_invalid_token_propagates() {
        let publisher = CheckRunPublisher::new(MockCheckRunClient::failing(401));
        let mut run = RunResult::with_writer("/repo", "Lint", Vec::new());

        let err = publisher.publish(&mut run, "o", "r", "abc").await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 401, .. }));
        assert!(String::from_utf8(run.writer().clone()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_other_errors_propagate() {
        let publisher = CheckRunPublisher::new(MockCheckRunClient::failing(500));
        let mut run = sample_run();

        let err = publisher.publish(&mut run, "o", "r", "abc").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
        assert_eq!(publisher.client().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_rate_limit_propagates_without_retry() {
        let client = MockCheckRunClient::with_response(MockResponse::Fail {
            status: 403,
            rate_limit_exhausted: true,
        });
        let publisher = CheckRunPublisher::new(client);
        let mut run = sample_run();

        let err = publisher.publish(&mut run, "o", "r", "abc").await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited { .. }));
        assert_eq!(publisher.client().requests().len(), 1);
    }
}
