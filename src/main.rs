//! Command-line front end for the catalog store.
//!
//! Runs one session: hydrates persisted state, touches the last-visited
//! marker, searches (the given query or the default term), applies any
//! requested favorite toggles and prints the resulting view.
//!
//! # Usage
//!
//! ```text
//! catalog-browser [QUERY] [--favorite ID]... [--detail ID] [--grid] [--config PATH]
//! ```

#![allow(clippy::multiple_crate_versions)]

use catalog_browser::app::StatusLine;
use catalog_browser::observability::init_tracing;
use catalog_browser::{initialize, CatalogEntry, CatalogState, Config, Destination, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "catalog-browser", version, about = "Browse and favorite software from the iTunes catalog")]
struct Args {
    /// Search term. Blank searches the configured default term.
    query: Option<String>,

    /// Toggle the favorite status of an entry from the results (repeatable).
    #[arg(long = "favorite", value_name = "ID")]
    favorites: Vec<i64>,

    /// Show the detail screen for an entry from the results or favorites.
    #[arg(long, value_name = "ID")]
    detail: Option<i64>,

    /// Show the results in grid layout.
    #[arg(long)]
    grid: bool,

    /// Configuration file. Defaults to the platform config directory.
    #[arg(long, env = "CATALOG_BROWSER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => Config::load(path),
        None => Config::load_or_default(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("catalog-browser: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    match run(&args, &config).await {
        Ok(state) => {
            let destination = destination_for(&state, args.detail);
            match &destination {
                Destination::Catalog => print_catalog(&state),
                Destination::Detail { entry } => print_detail(&state, &destination, entry),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "session failed");
            eprintln!("catalog-browser: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, config: &Config) -> Result<CatalogState> {
    let (runtime, store) = initialize(config)?;
    let task = runtime.spawn();

    store.start_session()?;
    let mut searches = 1;
    if let Some(query) = &args.query {
        store.search(query.as_str())?;
        searches += 1;
    }

    store
        .wait_for(|s| s.hydrated && s.search_generation >= searches && s.pending_searches == 0)
        .await?;

    for id in &args.favorites {
        store.toggle_favorite(*id)?;
    }
    if args.grid {
        store.toggle_view_mode()?;
    }

    store.shutdown().await?;
    if let Err(e) = task.await {
        tracing::warn!(error = %e, "store task ended abnormally");
    }

    Ok(store.snapshot())
}

/// Resolves `--detail`. An id missing from results and favorites falls back to
/// the catalog with a warning.
fn destination_for(state: &CatalogState, detail: Option<i64>) -> Destination {
    let Some(id) = detail else {
        return Destination::Catalog;
    };
    match state.entry(id) {
        Some(entry) => Destination::Detail {
            entry: entry.clone(),
        },
        None => {
            tracing::warn!(id = id, "detail entry not found, showing catalog");
            eprintln!("catalog-browser: entry {id} not found, showing catalog");
            Destination::Catalog
        }
    }
}

fn print_catalog(state: &CatalogState) {
    let view = state.compute_viewmodel(Utc::now());

    println!("{}", Destination::Catalog.title());
    println!("{}", view.last_visited);
    println!("[{}]", view.toggle_label);

    match &view.status {
        StatusLine::Loading => println!("Loading..."),
        StatusLine::Error(message) => println!("Error: {message}"),
        StatusLine::Empty => println!("No results."),
        StatusLine::Ready => {}
    }

    for row in view.rows.chunks(view.columns) {
        let line: Vec<String> = row
            .iter()
            .map(|r| {
                let star = if r.is_favorite { '★' } else { '☆' };
                format!("{star} {:>10}  {:<36} {:<14} {}", r.id, r.name, r.category, r.price)
            })
            .collect();
        println!("{}", line.join("  |  "));
    }

    if !view.favorites.is_empty() {
        println!();
        println!("Favorites:");
        for chip in &view.favorites {
            println!("  ★ {} ({})", chip.name, chip.id);
        }
    }
}

fn print_detail(state: &CatalogState, destination: &Destination, entry: &CatalogEntry) {
    let favorite = if state.is_favorite(entry.id) {
        "★ Favorite"
    } else {
        "☆ Not a favorite"
    };

    println!("{}", destination.title());
    println!();
    println!("{} ({})", entry.name, entry.id);
    println!("{} | {}", entry.category, entry.price);
    println!("{favorite}");
    println!();
    println!("{}", entry.description);
}
