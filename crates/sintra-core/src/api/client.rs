//! HTTP client for the Sintra backend API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::endpoint::{self, Endpoint};
use super::errors::{ApiError, extract_detail};
use crate::config::ApiConfig;
use crate::resources::{
    Acknowledgement, CreateTaskRequest, Resource, TaskCreated, ThinkRequest, ThinkResponse,
};
use crate::sync::ResourceFetcher;

/// Client for the backend REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            message: format!("'{}': {}", base_url, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                message: format!("'{}' cannot be used as a base URL", base_url),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url(), config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint against the base URL.
    ///
    /// Segments are percent-encoded individually, so identifiers containing
    /// `/` or `?` cannot escape their path position.
    pub fn url_for(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                message: format!("'{}' cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(endpoint.segments());

        if !endpoint.query().is_empty() {
            url.query_pairs_mut().extend_pairs(endpoint.query());
        }
        Ok(url)
    }

    /// Fetch the raw JSON body of an endpoint.
    pub async fn get_value(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        let url = self.url_for(endpoint)?;
        self.send(self.client.get(url.clone()), &url).await
    }

    /// Fetch and validate a typed resource.
    pub async fn get<R: Resource>(&self, endpoint: &Endpoint) -> Result<R, ApiError> {
        R::parse(self.get_value(endpoint).await?)
    }

    /// Create a task (`POST /tasks`).
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<TaskCreated, ApiError> {
        let url = self.url_for(&endpoint::tasks())?;
        let raw = self.send(self.client.post(url.clone()).json(request), &url).await?;
        TaskCreated::parse(raw)
    }

    /// Delete a task (`DELETE /tasks/{id}`).
    pub async fn delete_task(&self, task_id: &str) -> Result<Acknowledgement, ApiError> {
        let url = self.url_for(&endpoint::task(task_id))?;
        let raw = self.send(self.client.delete(url.clone()), &url).await?;
        Acknowledgement::parse(raw)
    }

    /// Ask the core agent to reason about a prompt (`POST /think`).
    pub async fn think(&self, request: &ThinkRequest) -> Result<ThinkResponse, ApiError> {
        let url = self.url_for(&endpoint::think())?;
        let raw = self.send(self.client.post(url.clone()).json(request), &url).await?;
        ThinkResponse::parse(raw)
    }

    /// Reset the core agent (`POST /agent/reset`).
    ///
    /// `success` is false when no agent was running; that is not an error.
    pub async fn reset_agent(&self) -> Result<Acknowledgement, ApiError> {
        let url = self.url_for(&endpoint::agent_reset())?;
        let raw = self.send(self.client.post(url.clone()), &url).await?;
        Acknowledgement::parse(raw)
    }

    /// Send a request and normalize every failure mode into [`ApiError`].
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Value, ApiError> {
        debug!(event = "core.api.request_started", url = %url);

        let response = request.send().await.map_err(|e| self.transport_error(url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        if !status.is_success() {
            let detail = extract_detail(&body);
            warn!(
                event = "core.api.request_failed",
                url = %url,
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or("")
            );
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        let value = serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        debug!(
            event = "core.api.request_completed",
            url = %url,
            status = status.as_u16()
        );
        Ok(value)
    }

    fn transport_error(&self, url: &Url, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            ApiError::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl ResourceFetcher for ApiClient {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        self.get_value(endpoint).await
    }
}
