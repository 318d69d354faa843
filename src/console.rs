//! Terminal text for both binaries: prompting, result listings, status lines.
//!
//! Everything here writes to a caller-supplied writer so the binaries can
//! print to stdout and tests can capture into a buffer.

use std::io::{self, BufRead, Write};

use libris_search::SearchError;

/// Prompt shown when no query was passed on the command line.
pub const PROMPT: &str = "Введите поисковый запрос (пример: Толкин): ";

/// Outcome of prompting for a query on standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptedQuery {
    /// A non-blank query, trimmed.
    Query(String),
    /// The line was blank.
    Empty,
    /// Standard input was closed before a line arrived.
    Unavailable,
}

/// Join command-line words into the query text, verbatim.
///
/// Returns `None` when no words were given.
pub fn query_from_args(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Print [`PROMPT`] and read one line.
///
/// # Errors
///
/// Returns any I/O error from writing the prompt or reading the line.
pub fn prompt_query<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<PromptedQuery> {
    write!(out, "{PROMPT}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(out)?;
        writeln!(
            out,
            "Стандартный ввод недоступен, передайте запрос аргументом командной строки."
        )?;
        return Ok(PromptedQuery::Unavailable);
    }

    let query = line.trim();
    if query.is_empty() {
        writeln!(out, "Пустой запрос, завершение.")?;
        return Ok(PromptedQuery::Empty);
    }
    Ok(PromptedQuery::Query(query.to_owned()))
}

/// Print a one-shot result listing.
///
/// # Errors
///
/// Returns any I/O error from `out`.
pub fn print_results<W: Write>(out: &mut W, query: &str, limit: usize, lines: &[String]) -> io::Result<()> {
    if lines.is_empty() {
        writeln!(out, "Результатов нет для запроса: {query}")?;
        return Ok(());
    }
    writeln!(out, "Показаны первые {limit} результатов по запросу: {query}")?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// User-facing error line.
pub fn error_line(err: &SearchError) -> String {
    format!("Ошибка: {err}")
}

/// Status shown by the shell while a search is queued or running.
pub const STATUS_SEARCHING: &str = "Поиск...";

/// Status shown by the shell for a blank query.
pub const STATUS_EMPTY_QUERY: &str = "Введите поисковый запрос";

/// Status shown by the shell after `:cancel`.
pub const STATUS_CANCELLED: &str = "Поиск отменён";

/// Status line after a finished search: count, or "nothing found".
pub fn found_status(count: usize) -> String {
    if count == 0 {
        "Ничего не найдено".to_owned()
    } else {
        format!("Найдено: {count}")
    }
}
