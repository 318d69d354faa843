//! The single-lane worker behind non-blocking searches.
//!
//! One OS thread owns a current-thread runtime and its own
//! [`QueryExecutor`]. Jobs are pulled from an unbounded FIFO queue and run
//! one at a time, so searches start and finish in submission order.

use std::thread::JoinHandle;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::context::Completion;
use super::rank::rank_and_format;
use crate::error::SearchError;
use crate::executor::QueryExecutor;

/// One queued non-blocking search.
pub(crate) struct QueuedSearch {
    pub id: u64,
    pub query: String,
    pub limit: usize,
    /// Child of the worker's shutdown token.
    pub cancel: CancellationToken,
    pub completion: Completion,
}

pub(crate) struct SearchWorker {
    tx: mpsc::UnboundedSender<QueuedSearch>,
    shutdown: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl SearchWorker {
    /// Spawn the worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the runtime or the thread cannot be
    /// created.
    pub fn spawn(executor: QueryExecutor) -> Result<Self, SearchError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SearchError::Config(format!("failed to create worker runtime: {e}")))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let stop = shutdown.clone();

        let thread = std::thread::Builder::new()
            .name("libris-search-worker".to_owned())
            .spawn(move || {
                runtime.block_on(run_lane(executor, rx, stop));
                tracing::trace!("search worker stopped");
            })
            .map_err(|e| SearchError::Config(format!("failed to spawn search worker: {e}")))?;

        Ok(Self {
            tx,
            shutdown,
            thread: Some(thread),
        })
    }

    /// A fresh per-search token that also fires on shutdown.
    pub fn job_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Queue `job` behind any searches already submitted.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Shutdown`] once the worker has been stopped.
    pub fn submit(&self, job: QueuedSearch) -> Result<(), SearchError> {
        if self.shutdown.is_cancelled() {
            return Err(SearchError::Shutdown);
        }
        self.tx.send(job).map_err(|_| SearchError::Shutdown)
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("search worker thread panicked");
            }
        }
    }
}

async fn run_lane(
    executor: QueryExecutor,
    mut rx: mpsc::UnboundedReceiver<QueuedSearch>,
    shutdown: CancellationToken,
) {
    loop {
        let job = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            next = rx.recv() => match next {
                Some(job) => job,
                None => break,
            },
        };

        let QueuedSearch {
            id,
            query,
            limit,
            cancel,
            completion,
        } = job;

        if cancel.is_cancelled() {
            tracing::trace!(id, "skipping cancelled search");
            continue;
        }

        tracing::trace!(id, limit, "search started");
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(id, "search interrupted");
                continue;
            }
            result = executor.execute(&query) => {
                result.map(|entries| rank_and_format(entries, limit))
            }
        };

        if let Err(ref err) = outcome {
            tracing::warn!(id, error = %err, "search failed");
        }
        completion.deliver(outcome, cancel, id);
    }

    // Anything still queued is dropped without a completion.
    rx.close();
    let mut dropped = 0usize;
    while rx.try_recv().is_ok() {
        dropped += 1;
    }
    if dropped > 0 {
        tracing::debug!(dropped, "discarded queued searches on shutdown");
    }
}
