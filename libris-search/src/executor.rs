//! Query execution: URL construction, HTTP exchange, status check, decode.

use reqwest::StatusCode;

use crate::config::ClientConfig;
use crate::error::{ProtocolError, SearchError};
use crate::http::build_client;
use crate::types::{Entry, SearchEnvelope};

/// Percent-encode `query` for use as a URL query component.
///
/// Uses `application/x-www-form-urlencoded` rules, so spaces become `+`.
pub fn encode_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

/// Performs one catalog search per call. Never retries.
///
/// Holds its own HTTP client; create one executor per execution context.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    client: reqwest::Client,
    endpoint: String,
    timeout_seconds: u64,
}

impl QueryExecutor {
    /// Build an executor from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            client: build_client(config)?,
            endpoint: config.endpoint.clone(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// The full request URL for `query`.
    pub fn request_url(&self, query: &str) -> String {
        format!("{}?q={}", self.endpoint, encode_query(query))
    }

    /// Search the catalog for `query`.
    ///
    /// Returns the decoded entries in API order. `null` placeholders from
    /// the payload are kept as `None`; filtering them is the caller's job.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Network`] if the exchange fails or times out
    /// - [`ProtocolError::BadStatus`] for any status other than 200
    /// - [`ProtocolError::MalformedPayload`] if the body cannot be decoded
    pub async fn execute(&self, query: &str) -> Result<Vec<Option<Entry>>, SearchError> {
        let url = self.request_url(query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "catalog request completed");

        if status != StatusCode::OK {
            return Err(ProtocolError::BadStatus(status.as_u16()).into());
        }

        let body = response.bytes().await.map_err(|e| self.network_error(e))?;
        let envelope = SearchEnvelope::decode(&body)?;
        Ok(envelope.into_entries())
    }

    fn network_error(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Network(format!(
                "request timed out after {}s",
                self.timeout_seconds
            ))
        } else {
            SearchError::Network(err.to_string())
        }
    }
}
