//! # libris
//!
//! Terminal front ends for [`libris_search`]: a one-shot `libris` command
//! that uses the blocking search path, and an interactive `libris-shell`
//! that uses the non-blocking path and keeps all printing on its main
//! thread.

pub mod config;
pub mod console;
pub mod error;

pub use config::LibrisConfig;
pub use error::{LibrisError, Result};
