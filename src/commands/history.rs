use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::models::HistoryEntry;
use crate::state::AppState;

#[derive(Serialize)]
struct HistoryResponse {
    history: Vec<HistoryEntry>,
}

/// Print the journal, most recent search first
pub fn show_history<W: Write>(state: &AppState, json: bool, out: &mut W) -> Result<()> {
    let history = state.history.read_recent();

    if json {
        serde_json::to_writer_pretty(&mut *out, &HistoryResponse { history })?;
        writeln!(out)?;
        return Ok(());
    }

    if history.is_empty() {
        writeln!(out, "No searches yet")?;
        return Ok(());
    }
    for entry in &history {
        writeln!(
            out,
            "{}  {:?}  {} results  [{}]",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.query,
            entry.results_count,
            entry.folders.join(", ")
        )?;
    }
    Ok(())
}

pub fn clear_history<W: Write>(state: &AppState, out: &mut W) -> Result<()> {
    state.history.clear().context("Failed to clear search history")?;
    writeln!(out, "Search history cleared")?;
    Ok(())
}
