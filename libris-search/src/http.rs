//! HTTP client construction for catalog requests.
//!
//! Every execution context (the blocking bridge and the worker lane) builds
//! its own [`reqwest::Client`] from the same [`ClientConfig`], so pooled
//! connections are always driven by the runtime that opened them.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::SearchError;

/// User-Agent sent when the configuration does not override it.
pub fn default_user_agent() -> String {
    format!("libris/{}", env!("CARGO_PKG_VERSION"))
}

/// Build a [`reqwest::Client`] configured for catalog requests.
///
/// The client has:
/// - Connect and request timeout from config
/// - User-Agent from config, or [`default_user_agent`]
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the client cannot be constructed.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => default_user_agent(),
    };
    let timeout = Duration::from_secs(config.timeout_seconds);

    reqwest::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))
}
