//! One-shot book search: `libris [QUERY]...`.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use libris::console::{self, PromptedQuery};
use libris::LibrisConfig;
use libris_search::SearchOrchestrator;
use tracing_subscriber::EnvFilter;

/// Search Open Library and print the top matches.
#[derive(Parser)]
#[command(name = "libris", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of results to print (overrides config).
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Search words; prompts on stdin when omitted.
    #[arg(value_name = "QUERY")]
    query: Vec<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so stdout carries only results.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("libris=warn,libris_search=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = LibrisConfig::load(cli.config.as_deref())?;
    let limit = match cli.limit {
        Some(0) => anyhow::bail!("--limit must be greater than 0"),
        Some(limit) => limit,
        None => config.cli.limit,
    };

    let mut stdout = io::stdout().lock();
    let query = match console::query_from_args(&cli.query) {
        Some(query) => query,
        None => match console::prompt_query(&mut io::stdin().lock(), &mut stdout)? {
            PromptedQuery::Query(query) => query,
            PromptedQuery::Empty | PromptedQuery::Unavailable => return Ok(ExitCode::SUCCESS),
        },
    };

    let orchestrator = SearchOrchestrator::new(&config.client)?;
    match orchestrator.search_blocking(&query, limit) {
        Ok(lines) => {
            console::print_results(&mut stdout, &query, limit, &lines)?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!(error = %err, "catalog request failed");
            eprintln!("{}", console::error_line(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}
