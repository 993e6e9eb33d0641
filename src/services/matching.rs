use crate::config::BackendSettings;
use crate::models::{BackendStatus, QueryInput, ResponsePayload};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the matching service
///
/// Each variant displays as the flat message shown in the error banner.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Request failed: {0}")]
    RequestFailed(u16),

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Matching service API client
///
/// Handles all communication with the matching backend:
/// - Submitting a project description to `/match`
/// - Probing `/test` for reachability
#[derive(Debug, Clone)]
pub struct MatchingClient {
    base_url: String,
    client: Client,
}

impl MatchingClient {
    /// Create a new client for the given backend base URL
    ///
    /// `timeout` of `None` lets a request run until the transport gives up.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, MatchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { base_url, client })
    }

    pub fn from_settings(settings: &BackendSettings) -> Result<Self, MatchError> {
        Self::new(
            settings.url.clone(),
            settings.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a query and return the ranked opportunities
    ///
    /// Exactly one request is sent; there is no retry.
    pub async fn find_matches(&self, input: &QueryInput) -> Result<ResponsePayload, MatchError> {
        let url = format!("{}/match", self.base_url);

        tracing::debug!("Submitting match query to: {}", url);

        let response = self.client.post(&url).json(input).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Match request rejected with status {}", status);
            return Err(MatchError::RequestFailed(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: ResponsePayload = serde_json::from_str(&body)?;

        payload
            .validate_results()
            .map_err(MatchError::InvalidResponse)?;

        tracing::debug!("Received {} opportunities", payload.results.len());

        Ok(payload)
    }

    /// Probe the backend's `/test` endpoint
    ///
    /// Any HTTP status is reported as-is; only transport failures are errors.
    pub async fn check_backend(&self) -> Result<BackendStatus, MatchError> {
        let url = format!("{}/test", self.base_url);

        tracing::debug!("Checking backend at: {}", url);

        let response = self.client.get(&url).send().await?;
        let status_code = response.status().as_u16();
        let body = response.text().await?;

        Ok(BackendStatus {
            url,
            status_code,
            body,
        })
    }
}
