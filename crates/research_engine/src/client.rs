use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use research_logging::{research_debug, research_warn};

use crate::types::ErrorBody;
use crate::{
    ApiConfig, FailureKind, HealthStatus, ResearchError, ResearchRequest, ResearchResponse,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            // Agent-backed research routinely takes a minute or more.
            request_timeout: Duration::from_secs(120),
            max_bytes: 1024 * 1024,
        }
    }
}

/// Transport boundary to the remote research API.
#[async_trait::async_trait]
pub trait ResearchClient: Send + Sync {
    /// Run one research request for an already validated, trimmed `query`.
    async fn research(&self, query: &str) -> Result<ResearchResponse, ResearchError>;

    async fn health(&self) -> Result<HealthStatus, ResearchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestResearchClient {
    config: ApiConfig,
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestResearchClient {
    pub fn new(config: ApiConfig, settings: ClientSettings) -> Result<Self, ResearchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ResearchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            config,
            settings,
            client,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ResearchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ResearchClient for ReqwestResearchClient {
    async fn research(&self, query: &str) -> Result<ResearchResponse, ResearchError> {
        let url = parse_endpoint(&self.config.research_endpoint())?;
        let request = ResearchRequest {
            query: query.to_string(),
        };
        let body = serde_json::to_vec(&request)
            .map_err(|err| ResearchError::new(FailureKind::InvalidRequest, err.to_string()))?;

        research_debug!("POST {} body_len={}", url, body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = self.read_body(response).await;

        if !status.is_success() {
            let server_error = body.ok().and_then(|bytes| parse_server_error(&bytes));
            research_warn!(
                "Research request failed status={} server_error={:?}",
                status,
                server_error
            );
            return Err(
                ResearchError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
                    .with_server_error(server_error),
            );
        }

        let bytes = body?;
        serde_json::from_slice::<ResearchResponse>(&bytes).map_err(|err| {
            research_warn!("Research response did not match expected shape: {}", err);
            ResearchError::new(FailureKind::MalformedResponse, err.to_string())
        })
    }

    async fn health(&self) -> Result<HealthStatus, ResearchError> {
        let url = parse_endpoint(&self.config.health_endpoint())?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        serde_json::from_slice::<HealthStatus>(&bytes)
            .map_err(|err| ResearchError::new(FailureKind::MalformedResponse, err.to_string()))
    }
}

fn parse_endpoint(endpoint: &str) -> Result<reqwest::Url, ResearchError> {
    reqwest::Url::parse(endpoint)
        .map_err(|err| ResearchError::new(FailureKind::InvalidUrl, err.to_string()))
}

/// Extract `{"error": "..."}` from a failure body; anything else yields `None`.
fn parse_server_error(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .map(|body| body.error)
        .filter(|message| !message.trim().is_empty())
}

fn too_large(max_bytes: u64, actual: u64) -> ResearchError {
    ResearchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ResearchError {
    if err.is_timeout() {
        return ResearchError::new(FailureKind::Timeout, err.to_string());
    }
    ResearchError::new(FailureKind::Network, err.to_string())
}
