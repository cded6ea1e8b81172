//! Shared blocking HTTP client construction.

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = concat!("lifeboard/", env!("CARGO_PKG_VERSION"));

/// Timeouts applied to every outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Total request timeout, connection plus transfer.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 120,
        }
    }
}

/// Creates a blocking client with the configured timeouts.
pub fn create_http_client(config: &HttpConfig) -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(USER_AGENT)
        .build()
}

/// Reads a response body for error reporting, capped to `max_chars`.
pub(crate) fn error_body(response: Response, max_chars: usize) -> String {
    let text = response.text().unwrap_or_default();
    let mut capped: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        capped.push_str("...");
    }
    capped
}
