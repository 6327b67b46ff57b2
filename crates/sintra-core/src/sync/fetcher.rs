use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiError, Endpoint};

/// Source of raw resource payloads.
///
/// Implemented by [`crate::api::ApiClient`]; tests substitute scripted fetchers.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, ApiError>;
}
