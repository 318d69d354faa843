//! [`SearchOrchestrator`]: blocking and non-blocking catalog search.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

use super::context::Completion;
use super::rank::rank_and_format;
use super::worker::{QueuedSearch, SearchWorker};
use crate::config::ClientConfig;
use crate::error::SearchError;
use crate::executor::QueryExecutor;

/// What a non-blocking search delivers: formatted lines, or the failure.
///
/// `Ok(vec![])` means "no results" and is never used to stand in for an error.
pub type SearchOutcome = Result<Vec<String>, SearchError>;

/// Cancellation handle for one non-blocking search.
#[derive(Debug, Clone)]
pub struct SearchHandle {
    id: u64,
    cancel: CancellationToken,
}

impl SearchHandle {
    /// Submission sequence number, unique per orchestrator.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Cancel this search.
    ///
    /// A queued search is skipped, an in-flight one is interrupted, and a
    /// completion already posted but not yet run is discarded. In every case
    /// the completion callback is never called.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether this search was cancelled, directly or by shutdown.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Drives catalog searches through two call paths sharing one core.
///
/// # Blocking path
///
/// [`search_blocking`](Self::search_blocking) runs on the caller's thread
/// over a private current-thread runtime. Concurrent blocking calls from
/// several threads are allowed and do not touch the worker lane.
///
/// # Non-blocking path
///
/// [`search_async`](Self::search_async) returns immediately. Searches run on
/// a dedicated single-lane worker. A search submitted while another is in
/// flight is **queued** (FIFO): nothing runs in parallel and completions
/// arrive in submission order. Completions are posted to the caller's
/// [`CompletionContext`](super::CompletionContext), never run on the worker.
///
/// # Shutdown
///
/// [`shutdown`](Self::shutdown) (also run on drop) refuses new work,
/// interrupts the in-flight search, drops queued ones, and discards any
/// completion posted but not yet run.
pub struct SearchOrchestrator {
    runtime: Option<tokio::runtime::Runtime>,
    blocking: QueryExecutor,
    worker: SearchWorker,
    next_id: AtomicU64,
}

impl SearchOrchestrator {
    /// Build an orchestrator and start its worker lane.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid or a runtime,
    /// HTTP client or worker thread cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, SearchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SearchError::Config(format!("failed to create runtime: {e}")))?;
        let blocking = QueryExecutor::new(config)?;
        let worker = SearchWorker::spawn(QueryExecutor::new(config)?)?;

        Ok(Self {
            runtime: Some(runtime),
            blocking,
            worker,
            next_id: AtomicU64::new(1),
        })
    }

    /// Search and wait for the formatted lines on the calling thread.
    ///
    /// # Errors
    ///
    /// Propagates the executor's [`SearchError`] unchanged.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context, like
    /// any blocking runtime entry point.
    pub fn search_blocking(&self, query: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        let runtime = self.runtime.as_ref().ok_or(SearchError::Shutdown)?;
        let entries = runtime.block_on(self.blocking.execute(query))?;
        let lines = rank_and_format(entries, limit);
        tracing::debug!(count = lines.len(), limit, "blocking search finished");
        Ok(lines)
    }

    /// Queue a search on the worker lane and return at once.
    ///
    /// The outcome, success or failure, is delivered through `completion`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Shutdown`] after [`shutdown`](Self::shutdown).
    pub fn search_async(
        &self,
        query: impl Into<String>,
        limit: usize,
        completion: Completion,
    ) -> Result<SearchHandle, SearchError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = self.worker.job_token();
        self.worker.submit(QueuedSearch {
            id,
            query: query.into(),
            limit,
            cancel: cancel.clone(),
            completion,
        })?;
        tracing::trace!(id, "search queued");
        Ok(SearchHandle { id, cancel })
    }

    /// Stop accepting work and interrupt everything pending. Idempotent.
    pub fn shutdown(&self) {
        if !self.worker.is_stopped() {
            tracing::debug!("search orchestrator shutting down");
        }
        self.worker.stop();
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.worker.is_stopped()
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.shutdown();
        // Safe to drop from inside another runtime.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}
