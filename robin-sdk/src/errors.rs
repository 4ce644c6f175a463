use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when using the Robin SDK
#[derive(Error, Debug)]
pub enum RobinError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("The required Access Token is missing or malformed")]
    AuthenticationMissing,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("An error occurred parsing the following response from the server: {body}")]
    Parse { body: String },

    #[error("The server response was malformed")]
    MalformedResponse,

    #[error("The response is not paginated")]
    NotPaginated,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No connection found")]
    NoConnection,

    #[error("Invalid channel name: {0}")]
    InvalidChannel(String),

    #[error("Grid transport error: {0}")]
    Transport(String),
}

/// Result type for Robin SDK operations
pub type Result<T> = std::result::Result<T, RobinError>;

/// A non-2xx response from the Robin API.
///
/// The fields are read from the `meta` object of the response body. When the
/// body has no usable `meta` the error falls back to the HTTP status and the
/// raw body text.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status_code: u16,
    pub status: Option<String>,
    pub message: String,
    pub more_info: Option<Value>,
}

impl ApiError {
    pub fn from_response(http_status: u16, body: &Value) -> Self {
        let Some(meta) = body.get("meta").and_then(Value::as_object) else {
            return Self::generic(http_status, body);
        };

        let status_code = meta
            .get("status_code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(http_status);

        Self {
            status_code,
            status: meta.get("status").and_then(Value::as_str).map(str::to_owned),
            message: meta
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Request failed with status {}", http_status)),
            more_info: meta.get("more_info").filter(|v| !v.is_null()).cloned(),
        }
    }

    fn generic(http_status: u16, body: &Value) -> Self {
        let message = match body {
            Value::Null => format!("Request failed with status {}", http_status),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Self {
            status_code: http_status,
            status: None,
            message,
            more_info: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            Some(status) => write!(f, "{} {}: {}", self.status_code, status, self.message),
            None => write!(f, "{}: {}", self.status_code, self.message),
        }
    }
}

impl std::error::Error for ApiError {}
