//! Client configuration with sensible defaults.
//!
//! [`ClientConfig`] controls where queries are sent, how long a single
//! exchange may take, and which User-Agent identifies the client.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default Open Library search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openlibrary.org/search.json";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Configuration for the catalog HTTP client.
///
/// Use [`Default::default()`] for the public Open Library endpoint, or
/// construct with field overrides (tests point `endpoint` at a mock server).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Search endpoint; the encoded query is appended as `?q=<query>`.
    pub endpoint: String,
    /// Connect and whole-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, `libris/<version>` is sent.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `endpoint` must be an absolute `http` or `https` URL without a query
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.endpoint.trim().is_empty() {
            return Err(SearchError::Config("endpoint must not be empty".into()));
        }
        let parsed = url::Url::parse(&self.endpoint)
            .map_err(|e| SearchError::Config(format!("invalid endpoint: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "endpoint scheme must be http or https, got {}",
                parsed.scheme()
            )));
        }
        if parsed.query().is_some() {
            return Err(SearchError::Config(
                "endpoint must not carry a query string".into(),
            ));
        }
        Ok(())
    }
}
