//! # libris-search
//!
//! Book search against the public Open Library API.
//!
//! A free-text query becomes a bounded, ordered list of display lines of the
//! form `"<title> — <authors> (<year>)"`.
//!
//! ## Design
//!
//! - [`executor::QueryExecutor`] performs one GET per query with a fixed
//!   timeout and never retries
//! - [`orchestrator::rank_and_format`] drops null entries, caps the count
//!   and formats, preserving API order
//! - [`SearchOrchestrator`] exposes that pipeline both as a blocking call and
//!   as a non-blocking call on a single-lane worker whose completions are
//!   posted to a caller-chosen [`CompletionContext`]
//!
//! ## Errors
//!
//! Network failures, non-200 statuses and undecodable bodies are distinct
//! [`SearchError`] values. An empty result is `Ok(vec![])`, never an error.

pub mod config;
pub mod error;
pub mod executor;
pub mod format;
pub mod http;
pub mod orchestrator;
pub mod types;

pub use config::ClientConfig;
pub use error::{ProtocolError, Result, SearchError};
pub use executor::QueryExecutor;
pub use format::format_entry;
pub use orchestrator::{
    channel_context, rank_and_format, ChannelContext, Completion, CompletionContext, ContextPump,
    SearchHandle, SearchOrchestrator, SearchOutcome,
};
pub use types::{Entry, SearchEnvelope};

/// Search with a one-off orchestrator and wait for the result.
///
/// Convenience wrapper for callers that only ever need the blocking path.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid `config`, otherwise the
/// same errors as [`SearchOrchestrator::search_blocking`].
///
/// # Examples
///
/// ```no_run
/// # fn example() -> libris_search::Result<()> {
/// let config = libris_search::ClientConfig::default();
/// for line in libris_search::search_blocking("Толкин", 5, &config)? {
///     println!("{line}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn search_blocking(query: &str, limit: usize, config: &ClientConfig) -> Result<Vec<String>> {
    SearchOrchestrator::new(config)?.search_blocking(query, limit)
}
