//! The pure core shared by both call paths.

use crate::format::format_entry;
use crate::types::Entry;

/// Drop `None` placeholders, keep at most `limit` entries in source order,
/// and format each one.
///
/// No sorting happens here: the API's relevance order is authoritative.
pub fn rank_and_format<I>(entries: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = Option<Entry>>,
{
    entries
        .into_iter()
        .flatten()
        .take(limit)
        .map(|entry| format_entry(&entry))
        .collect()
}
