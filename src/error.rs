//! Error types for the libris application crate.

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum LibrisError {
    /// Configuration file or value error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog search error.
    #[error(transparent)]
    Search(#[from] libris_search::SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LibrisError>;
