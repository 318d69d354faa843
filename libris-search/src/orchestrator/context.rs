//! Completion hand-off to the caller's presentation context.
//!
//! The worker lane never runs caller code. It wraps each outcome in a job
//! and posts it to a [`CompletionContext`]; the context decides where that
//! job runs. [`ChannelContext`] is the provided implementation: jobs travel
//! over a channel and run wherever the matching [`ContextPump`] is drained,
//! typically the thread that owns presentation state.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tokio_util::sync::CancellationToken;

use super::search::SearchOutcome;

/// A unit of work to run on the completion context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere completion jobs can be posted to.
///
/// Implementations must not run the job inline on the posting thread; the
/// whole point is to move it off the worker lane.
pub trait CompletionContext: Send + Sync + 'static {
    /// Schedule `job` to run on this context.
    fn post(&self, job: Job);
}

/// Channel-backed [`CompletionContext`].
#[derive(Debug, Clone)]
pub struct ChannelContext {
    tx: Sender<Job>,
}

/// Receiving end of a [`ChannelContext`]; runs posted jobs on the thread
/// that drains it.
#[derive(Debug)]
pub struct ContextPump {
    rx: Receiver<Job>,
}

/// Create a connected [`ChannelContext`] / [`ContextPump`] pair.
pub fn channel_context() -> (ChannelContext, ContextPump) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (ChannelContext { tx }, ContextPump { rx })
}

impl CompletionContext for ChannelContext {
    fn post(&self, job: Job) {
        if self.tx.send(job).is_err() {
            tracing::trace!("completion context closed, dropping job");
        }
    }
}

impl ContextPump {
    /// Block until one job arrives and run it.
    ///
    /// Returns `false` once every [`ChannelContext`] clone has been dropped
    /// and the queue is empty.
    pub fn run_next(&self) -> bool {
        match self.rx.recv() {
            Ok(job) => {
                job();
                true
            }
            Err(_) => false,
        }
    }

    /// Like [`run_next`](Self::run_next) but gives up after `timeout`.
    ///
    /// Returns `true` only if a job ran.
    pub fn run_next_timeout(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(job) => {
                job();
                true
            }
            Err(_) => false,
        }
    }

    /// Run every job already queued without blocking. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// The underlying receiver, for callers that multiplex it with other
    /// event sources via `crossbeam_channel::select!`.
    pub fn receiver(&self) -> &Receiver<Job> {
        &self.rx
    }
}

/// The caller's half of a non-blocking search: where to deliver, and what to
/// call with the outcome once there.
pub struct Completion {
    context: Arc<dyn CompletionContext>,
    callback: Box<dyn FnOnce(SearchOutcome) + Send + 'static>,
}

impl Completion {
    /// Deliver to `callback` on `context`.
    pub fn new<F>(context: Arc<dyn CompletionContext>, callback: F) -> Self
    where
        F: FnOnce(SearchOutcome) + Send + 'static,
    {
        Self {
            context,
            callback: Box::new(callback),
        }
    }

    /// Post the outcome to the completion context.
    ///
    /// `gate` is re-checked when the job runs on the context: if the search
    /// was cancelled or the orchestrator shut down in between, the outcome is
    /// discarded without calling back.
    pub(crate) fn deliver(self, outcome: SearchOutcome, gate: CancellationToken, id: u64) {
        let Self { context, callback } = self;
        context.post(Box::new(move || {
            if gate.is_cancelled() {
                tracing::trace!(id, "discarding completion of cancelled search");
                return;
            }
            callback(outcome);
        }));
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}
