//! @ai:module:intent Publish aggregated CI diagnostics as a GitHub check run
//! @ai:module:layer application
//! @ai:module:public_api client, config, output, publish

pub mod client;
pub mod config;
pub mod output;
pub mod publish;

pub use checkrun_core;
pub use client::{ApiError, CheckRunClient, Credentials, GitHubClient, MockCheckRunClient};
pub use config::CheckrunConfig;
pub use output::{format_summary, write_summary, OutputFormat};
pub use publish::{build_request, CheckRunPublisher, PublishOutcome};
