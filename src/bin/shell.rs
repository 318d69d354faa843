//! Interactive book search: one query per line, results as they arrive.
//!
//! The main thread owns the terminal. Input lines come from a reader thread
//! and search completions come from the orchestrator's worker, both over
//! channels, so every print happens here and nothing blocks on the network.
//! `:cancel` drops the most recent pending search, `:quit` or EOF exits.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use crossbeam_channel::select;
use libris::LibrisConfig;
use libris::console;
use libris_search::orchestrator::context::Job;
use libris_search::{Completion, SearchHandle, SearchOrchestrator, channel_context};
use tracing_subscriber::EnvFilter;

/// Interactive Open Library search.
#[derive(Parser)]
#[command(name = "libris-shell", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of results per search (overrides config).
    #[arg(short = 'n', long)]
    limit: Option<usize>,
}

enum Event {
    Line(String),
    Completed(Job),
    Closed,
}

enum Command {
    Quit,
    Cancel,
    Search(String),
    Blank,
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        ":quit" | ":q" => Command::Quit,
        ":cancel" => Command::Cancel,
        "" => Command::Blank,
        query => Command::Search(query.to_owned()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("libris=info,libris_search=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = LibrisConfig::load(cli.config.as_deref())?;
    let limit = match cli.limit {
        Some(0) => anyhow::bail!("--limit must be greater than 0"),
        Some(limit) => limit,
        None => config.shell.limit,
    };

    let orchestrator = SearchOrchestrator::new(&config.client)?;
    let (context, pump) = channel_context();
    let context = Arc::new(context);

    let (line_tx, line_rx) = crossbeam_channel::unbounded::<String>();
    std::thread::Builder::new()
        .name("libris-shell-input".to_owned())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    println!("{}", console::PROMPT.trim_end());
    let mut last: Option<SearchHandle> = None;

    loop {
        let event = select! {
            recv(line_rx) -> line => line.map_or(Event::Closed, Event::Line),
            recv(pump.receiver()) -> job => job.map_or(Event::Closed, Event::Completed),
        };

        let line = match event {
            Event::Closed => break,
            Event::Completed(job) => {
                job();
                continue;
            }
            Event::Line(line) => line,
        };

        match parse_command(&line) {
            Command::Quit => break,
            Command::Blank => println!("{}", console::STATUS_EMPTY_QUERY),
            Command::Cancel => {
                if let Some(handle) = last.take() {
                    handle.cancel();
                    println!("{}", console::STATUS_CANCELLED);
                }
            }
            Command::Search(query) => {
                println!("{}", console::STATUS_SEARCHING);
                let heading = query.clone();
                let completion = Completion::new(context.clone(), move |outcome| match outcome {
                    Ok(lines) => {
                        println!("— {heading}");
                        for line in &lines {
                            println!("{line}");
                        }
                        println!("{}", console::found_status(lines.len()));
                    }
                    Err(err) => println!("{}", console::error_line(&err)),
                });
                last = Some(orchestrator.search_async(query, limit, completion)?);
            }
        }
    }

    orchestrator.shutdown();
    // Runs the discard path for anything the worker posted before stopping.
    pump.run_pending();
    tracing::debug!("libris-shell exiting");
    Ok(())
}
