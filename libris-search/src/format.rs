//! Single-line rendering of catalog entries.

use crate::types::Entry;

/// Shown when an entry has no authors, or an empty author list.
pub const AUTHOR_FALLBACK: &str = "Автор не указан";

/// Shown when an entry has no first publish year.
pub const YEAR_FALLBACK: &str = "?";

/// Render `entry` as `"<title> — <authors> (<year>)"`.
///
/// An absent title renders as empty text; there is deliberately no title
/// fallback.
pub fn format_entry(entry: &Entry) -> String {
    let title = entry.title.as_deref().unwrap_or_default();
    let authors = match entry.authors.as_deref() {
        Some(names) if !names.is_empty() => names.join(", "),
        _ => AUTHOR_FALLBACK.to_owned(),
    };
    let year = match entry.first_publish_year {
        Some(year) => year.to_string(),
        None => YEAR_FALLBACK.to_owned(),
    };
    format!("{title} — {authors} ({year})")
}
