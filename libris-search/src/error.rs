//! Error types for the libris-search crate.
//!
//! Network failures, protocol failures and configuration problems are kept
//! apart so callers can tell "the API said no" from "the API could not be
//! reached" and from "the API answered with something unreadable".

/// Errors that can occur while searching the catalog.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The HTTP exchange could not complete (DNS, refused connection,
    /// timeout, interruption).
    #[error("network error: {0}")]
    Network(String),

    /// The exchange completed but the response was not usable.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Invalid client configuration or call arguments.
    #[error("config error: {0}")]
    Config(String),

    /// A non-blocking search was submitted after the orchestrator shut down.
    #[error("search orchestrator has shut down")]
    Shutdown,
}

/// Failures where the server answered but not with a decodable success.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The server replied with a status other than 200.
    #[error("API returned status {0}")]
    BadStatus(u16),

    /// Status was 200 but the body did not match the expected schema.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl SearchError {
    /// The status code of a [`ProtocolError::BadStatus`] failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Protocol(ProtocolError::BadStatus(code)) => Some(*code),
            _ => None,
        }
    }
}

/// Convenience type alias for libris-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
