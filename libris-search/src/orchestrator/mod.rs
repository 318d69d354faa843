//! Search orchestrator: filter, cap and format, over two call paths.
//!
//! Both call paths share [`rank::rank_and_format`]. The blocking path drives
//! the executor on the caller's thread; the non-blocking path hands the
//! search to a single-lane worker and delivers the outcome through a
//! [`context::CompletionContext`] chosen by the caller.

pub mod context;
pub mod rank;
pub mod search;
mod worker;

pub use context::{channel_context, ChannelContext, Completion, CompletionContext, ContextPump};
pub use rank::rank_and_format;
pub use search::{SearchHandle, SearchOrchestrator, SearchOutcome};
