//! Client configuration.
//!
//! Loaded from `config.toml`; every field has a default so a missing or
//! partial file still yields a usable configuration.

use crate::error::{Result, UnibotError};
use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/";
pub const DEFAULT_LOGOUT_REDIRECT_DELAY_MS: u64 = 500;

/// Relative paths of the backend endpoints, joined onto `base_url`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EndpointConfig {
    pub login: String,
    pub chat: String,
    pub upload: String,
    pub history: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            login: "login/".to_string(),
            chat: "chat/".to_string(),
            upload: "upload_file/".to_string(),
            history: "file_records".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// The one base address every request is issued against.
    pub base_url: String,
    /// Request timeout in seconds. `None` means requests never time out,
    /// so a stalled request keeps the chat pending until it settles.
    pub request_timeout_secs: Option<u64>,
    pub endpoints: EndpointConfig,
    /// Delay between clearing the session on logout and showing the login surface.
    pub logout_redirect_delay_ms: u64,
    pub max_upload_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            endpoints: EndpointConfig::default(),
            logout_redirect_delay_ms: DEFAULT_LOGOUT_REDIRECT_DELAY_MS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn logout_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.logout_redirect_delay_ms)
    }

    /// Base URL with exactly one trailing slash, so endpoint paths join
    /// beneath it instead of replacing its last segment.
    pub fn normalized_base_url(&self) -> Result<String> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(UnibotError::config("base_url must not be empty"));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(UnibotError::config(format!(
                "base_url must be an http(s) address, got '{}'",
                self.base_url
            )));
        }
        Ok(format!("{trimmed}/"))
    }
}
