//! Anvesh - search text across folders of local documents
//!
//! The library walks folders, pulls text out of plain text, Word, Excel,
//! PowerPoint and PDF files, and reports every line, paragraph, cell or
//! shape containing the query. It offers:
//!
//! - A batch search and a streaming search over the same pipeline
//! - A bounded JSON journal of past searches
//! - Optional image and video analysis through external tools
//!
//! # Example
//!
//! ```no_run
//! use anvesh::{search, SearchQuery};
//! use std::path::PathBuf;
//!
//! let query = SearchQuery::new("invoice", vec![PathBuf::from("/home/me/Documents")]);
//! for file in search(&query)? {
//!     println!("{} ({} hits)", file.file_path, file.total_occurrences);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod ai;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod search;
pub mod state;

pub use config::Config;
pub use error::{AiError, ConfigError, ExtractError, HistoryError, OpenError, SearchError};
pub use models::{FileResult, HistoryEntry, MatchRecord, SearchEvent, SearchOptions, SearchQuery, Section};
pub use search::{search, search_streaming, HistoryLog, SearchStream};
pub use state::AppState;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

/// Entry point of the `anvesh` binary
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_or_default(path),
        None => Config::load(),
    };
    let state = AppState::new(config);

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::dispatch(&state, command, &mut out)
}

/// Logs go to stderr so search output on stdout stays machine-readable
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "anvesh=debug" } else { "anvesh=info" };
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
