//! Backend contract: request outcomes, wire payloads and the backend traits.
//!
//! Every call made through the request pipeline ends in an [`ApiResult`]:
//! `Ok(payload)`, `Err(ApiError::AuthExpired)` or `Err(ApiError::Failure)`.
//! The pipeline has already cleared the credential store by the time a caller
//! sees `AuthExpired`; reacting to it (navigation) is up to the UI dispatcher.

use crate::upload::{UploadFile, UploadHistoryEntry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Details of a failed request.
///
/// `status` is `None` for transport failures (offline, DNS, timeout), where
/// no response was received at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub status: Option<u16>,
    /// `error` field of the response body, if any.
    pub error: Option<String>,
    /// `message` field of the response body, if any.
    pub message: Option<String>,
    pub description: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

fn non_empty_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl FailureDetail {
    /// A request that never produced a response.
    pub fn transport(description: impl Into<String>) -> Self {
        Self {
            status: None,
            error: None,
            message: None,
            description: description.into(),
        }
    }

    /// A non-success response. The body is searched for `error` / `message`
    /// fields; a body that is not JSON is kept only in the description.
    pub fn http(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let error = non_empty_text(parsed.error);
        let message = non_empty_text(parsed.message);

        let description = match (&error, &message) {
            (Some(text), _) | (None, Some(text)) => format!("HTTP {status}: {text}"),
            (None, None) if body.trim().is_empty() => format!("HTTP {status}"),
            (None, None) => format!("HTTP {status}: {}", body.trim()),
        };

        Self {
            status: Some(status),
            error,
            message,
            description,
        }
    }

    /// A success status whose body could not be decoded.
    pub fn malformed(status: u16, description: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            error: None,
            message: None,
            description: description.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        self.status.is_none()
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Error side of every request issued through the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered 401; the session has already been cleared.
    #[error("Session expired")]
    AuthExpired,

    /// Any other error status, malformed payload, or transport failure.
    #[error("Request failed: {0}")]
    Failure(FailureDetail),
}

impl ApiError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Server-provided `error` text, if the failure carried one.
    pub fn server_error(&self) -> Option<&str> {
        match self {
            Self::Failure(detail) => detail.error.as_deref(),
            Self::AuthExpired => None,
        }
    }

    /// Server-provided `message` text, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Failure(detail) => detail.message.as_deref(),
            Self::AuthExpired => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// ============================================================================
// Wire payloads
// ============================================================================

/// Body of the login request. The backend reads the identifier as `username`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "username")]
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: TokenPair,
    pub user: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
}

/// Body of a successful chat response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
        }
    }

    /// The reply text when present and not blank.
    pub fn non_empty(&self) -> Option<&str> {
        self.response
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Body of a successful upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub inserted: Option<u64>,
    #[serde(default)]
    pub skipped: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub message: Option<Vec<UploadHistoryEntry>>,
}

// ============================================================================
// Backend traits
// ============================================================================

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, prompt: &str) -> ApiResult<ChatReply>;
}

#[async_trait]
pub trait UploadBackend: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> ApiResult<UploadReceipt>;

    async fn history(&self) -> ApiResult<Vec<UploadHistoryEntry>>;
}
