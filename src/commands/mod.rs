//! Command handlers
//!
//! Each CLI subcommand maps to one handler here. Handlers write to any
//! `io::Write` so they can be driven without a terminal.

mod ai;
mod files;
mod history;
mod search;

pub use ai::run_ai;
pub use files::open_file;
pub use history::{clear_history, show_history};
pub use search::{run_search, OutputMode};

use anyhow::Result;
use std::io::Write;

use crate::cli::Commands;
use crate::state::AppState;

pub fn dispatch<W: Write>(state: &AppState, command: &Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Search(args) => {
            let mode = if args.stream {
                OutputMode::Stream
            } else if args.json {
                OutputMode::Json
            } else {
                OutputMode::Human
            };
            run_search(state, &args.to_query(), mode, out)?;
        }
        Commands::History { json, clear } => {
            if *clear {
                clear_history(state, out)?;
            } else {
                show_history(state, *json, out)?;
            }
        }
        Commands::Open { path, line } => {
            open_file(&state.config.open, path, *line)?;
        }
        Commands::Ai(command) => run_ai(state, command, out)?,
    }
    Ok(())
}
