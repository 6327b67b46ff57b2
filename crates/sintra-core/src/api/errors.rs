use crate::errors::SintraError;

/// Failure talking to the backend API.
///
/// Every variant carries owned strings so errors can be cloned into view
/// state and across tasks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Could not reach {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Server returned HTTP {status} for {url}")]
    Status {
        url: String,
        status: u16,
        detail: Option<String>,
    },

    #[error("Invalid JSON from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Unexpected response shape: {message}")]
    Schema { message: String },

    #[error("Server reported an error: {message}")]
    Server { message: String },

    #[error("Invalid request URL: {message}")]
    InvalidUrl { message: String },

    #[error("Failed to create HTTP client: {message}")]
    ClientBuild { message: String },
}

impl ApiError {
    /// Message suitable for showing to an end user.
    ///
    /// A message supplied by the server wins over the generic text for the
    /// failure kind.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Status { status: 404, .. } => "The requested resource was not found".to_string(),
            ApiError::Status { status, .. } => {
                format!("The server returned an error (HTTP {})", status)
            }
            ApiError::Server { message } => message.clone(),
            ApiError::Transport { .. } => "Unable to reach the server".to_string(),
            ApiError::Timeout { .. } => "The server took too long to respond".to_string(),
            ApiError::Decode { .. } | ApiError::Schema { .. } => {
                "The server sent an unexpected response".to_string()
            }
            ApiError::InvalidUrl { .. } | ApiError::ClientBuild { .. } => self.to_string(),
        }
    }
}

impl SintraError for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Transport { .. } => "API_TRANSPORT_ERROR",
            ApiError::Timeout { .. } => "API_TIMEOUT",
            ApiError::Status { .. } => "API_STATUS_ERROR",
            ApiError::Decode { .. } => "API_DECODE_ERROR",
            ApiError::Schema { .. } => "API_SCHEMA_ERROR",
            ApiError::Server { .. } => "API_SERVER_ERROR",
            ApiError::InvalidUrl { .. } => "API_INVALID_URL",
            ApiError::ClientBuild { .. } => "API_CLIENT_BUILD_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ApiError::Status {
                status: 400..=499,
                ..
            } | ApiError::InvalidUrl { .. }
        )
    }
}

/// Extract a human-readable message from an error response body.
///
/// Recognizes `{"detail": "..."}`, validation arrays
/// (`{"detail": [{"msg": "..."}]}`), and `message` / `error` string fields.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let detail = match value.get("detail") {
        Some(serde_json::Value::String(detail)) => Some(detail.clone()),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    };

    detail
        .or_else(|| string_field(&value, "message"))
        .or_else(|| string_field(&value, "error"))
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn string_field(value: &serde_json::Value, field: &str) -> Option<String> {
    value.get(field).and_then(|v| v.as_str()).map(str::to_string)
}
