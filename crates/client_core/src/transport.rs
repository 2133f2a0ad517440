//! HTTP binding of the remote analysis interface.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::AnalysisError,
    protocol::{decode_analysis_response, AnalysisRequest, AnalysisResult},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::AnalysisService;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
    pub endpoint: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl HttpServiceConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportSetupError {
    #[error("unsupported endpoint scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

pub struct HttpAnalysisService {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpAnalysisService {
    pub fn new(config: HttpServiceConfig) -> Result<Self, TransportSetupError> {
        match config.endpoint.scheme() {
            "http" | "https" => {}
            other => return Err(TransportSetupError::UnsupportedScheme(other.to_string())),
        }

        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint,
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(
        &self,
        request_id: Uuid,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key).header("apikey", api_key);
        }

        let response = builder.send().await.map_err(|err| {
            warn!(%request_id, error = %err, "analysis request failed to complete");
            AnalysisError::Transport {
                reason: describe_send_failure(&err),
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            warn!(%request_id, error = %err, "failed to read analysis response body");
            AnalysisError::Transport {
                reason: describe_send_failure(&err),
            }
        })?;
        debug!(
            %request_id,
            status = status.as_u16(),
            bytes = body.len(),
            "analysis response received"
        );

        decode_analysis_response(status.is_success(), &status.to_string(), &body)
    }
}

/// User-facing wording for failures that never produced a response.
///
/// Returns `None` when there is nothing more specific to say than the generic
/// fallback.
fn describe_send_failure(err: &reqwest::Error) -> Option<String> {
    if err.is_timeout() {
        Some("The analysis service did not respond in time.".to_string())
    } else if err.is_connect() {
        Some("Could not reach the analysis service; check the network and retry.".to_string())
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
