//! @ai:module:intent GitHub check-run API client behind an injectable trait
//! @ai:module:layer infrastructure
//! @ai:module:public_api CheckRunClient, GitHubClient, MockCheckRunClient, Credentials, CheckRunRequest, CheckRunOutput, CreatedCheckRun, ApiError
//! @ai:module:stateless false

use crate::config::ApiConfig;
use checkrun_core::Annotation;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

/// @ai:intent Caller-supplied credentials; never generated here
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    /// Sent as the `User-Agent` client identity.
    pub client_name: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"***")
            .field("client_name", &self.client_name)
            .finish()
    }
}

/// @ai:intent Classified failure of a remote API call
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("authorization denied ({status}): {message}")]
    AuthorizationDenied { status: u16, message: String },

    #[error("rate limited ({status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("GitHub API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// @ai:intent Map a non-success response to an error class
    /// @ai:pre !status.is_success()
    /// @ai:effects pure
    /// @ai:edge_cases 403 with an exhausted rate limit is rate limiting, not a permission problem
    /// @ai:edge_cases 401 means the token itself is invalid and is not a permission denial
    pub fn from_response(status: StatusCode, headers: &HeaderMap, body: String) -> Self {
        let code = status.as_u16();
        let rate_limit_exhausted = headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");

        match status {
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited { status: code, message: body },
            StatusCode::FORBIDDEN if rate_limit_exhausted => {
                ApiError::RateLimited { status: code, message: body }
            }
            StatusCode::FORBIDDEN => ApiError::AuthorizationDenied { status: code, message: body },
            _ => ApiError::Status { status: code, message: body },
        }
    }

    pub fn is_authorization_denied(&self) -> bool {
        matches!(self, ApiError::AuthorizationDenied { .. })
    }
}

/// @ai:intent Check-run creation request body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckRunRequest {
    pub name: String,
    pub head_sha: String,
    pub status: &'static str,
    pub conclusion: &'static str,
    pub completed_at: String,
    pub output: CheckRunOutput,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckRunOutput {
    pub title: String,
    pub summary: String,
    pub annotations: Vec<Annotation>,
}

/// @ai:intent Fields of the created check run that callers report on
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreatedCheckRun {
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// @ai:intent Remote capability for creating check runs
#[allow(async_fn_in_trait)]
pub trait CheckRunClient {
    /// @ai:intent Create a completed check run on a repository
    async fn create_check_run(
        &self,
        owner: &str,
        repo: &str,
        request: &CheckRunRequest,
    ) -> Result<CreatedCheckRun, ApiError>;
}

/// @ai:intent GitHub REST client for check runs
pub struct GitHubClient {
    client: reqwest::Client,
    config: ApiConfig,
    credentials: Credentials,
}

impl GitHubClient {
    /// @ai:intent Create a client from API config and caller credentials
    /// @ai:effects pure
    pub fn new(config: ApiConfig, credentials: Credentials) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(credentials.client_name.clone())
            .build()?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    fn check_runs_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/check-runs",
            self.config.base_url.trim_end_matches('/'),
            owner,
            repo
        )
    }
}

impl CheckRunClient for GitHubClient {
    /// @ai:intent POST a check run; one attempt, no retry
    /// @ai:effects network
    async fn create_check_run(
        &self,
        owner: &str,
        repo: &str,
        request: &CheckRunRequest,
    ) -> Result<CreatedCheckRun, ApiError> {
        let url = self.check_runs_url(owner, repo);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.credentials.token)
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", &self.config.api_version)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let headers = response.headers().clone();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &headers, error_text));
        }

        response
            .json::<CreatedCheckRun>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// @ai:intent Scripted outcome for the mock client
#[derive(Debug, Clone)]
pub enum MockResponse {
    Created(CreatedCheckRun),
    Fail { status: u16, rate_limit_exhausted: bool },
}

/// @ai:intent Mock client for testing; records every request it receives
pub struct MockCheckRunClient {
    response: MockResponse,
    requests: Mutex<Vec<(String, String, CheckRunRequest)>>,
}

impl MockCheckRunClient {
    /// @ai:intent Create a mock that accepts every request
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::with_response(MockResponse::Created(CreatedCheckRun {
            id: 1,
            html_url: Some("https://github.com/owner/repo/runs/1".to_string()),
        }))
    }

    /// @ai:intent Create a mock that fails every request with the given status
    /// @ai:effects pure
    pub fn failing(status: u16) -> Self {
        Self::with_response(MockResponse::Fail {
            status,
            rate_limit_exhausted: false,
        })
    }

    pub fn with_response(response: MockResponse) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Requests received so far as (owner, repo, request)
    /// @ai:effects state:read
    pub fn requests(&self) -> Vec<(String, String, CheckRunRequest)> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockCheckRunClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckRunClient for MockCheckRunClient {
    /// @ai:intent Record the request and return the scripted response
    /// @ai:effects state:write
    async fn create_check_run(
        &self,
        owner: &str,
        repo: &str,
        request: &CheckRunRequest,
    ) -> Result<CreatedCheckRun, ApiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((owner.to_string(), repo.to_string(), request.clone()));
        }

        match &self.response {
            MockResponse::Created(created) => Ok(created.clone()),
            MockResponse::Fail {
                status,
                rate_limit_exhausted,
            } => {
                let status = StatusCode::from_u16(*status)
                    .map_err(|e| ApiError::Decode(e.to_string()))?;
                let mut headers = HeaderMap::new();
                if *rate_limit_exhausted {
                    headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
                }
                Err(ApiError::from_response(status, &headers, "mock failure".to_string()))
            }
        }
    }
}
