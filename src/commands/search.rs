use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::models::{FileResult, HistoryEntry, MatchRecord, SearchEvent, SearchQuery};
use crate::search::{search, search_streaming};
use crate::state::AppState;

/// How search results reach the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    /// One event per line as the search runs
    Stream,
}

#[derive(Serialize)]
struct BatchResponse<'a> {
    results: &'a [FileResult],
}

/// Run a search, write it to `out` and record it in the history journal.
/// Returns the number of files with matches.
pub fn run_search<W: Write>(state: &AppState, query: &SearchQuery, mode: OutputMode, out: &mut W) -> Result<usize> {
    let total_results = match mode {
        OutputMode::Stream => stream_events(query, out)?,
        OutputMode::Json => {
            let results = search(query)?;
            serde_json::to_writer_pretty(&mut *out, &BatchResponse { results: &results })?;
            writeln!(out)?;
            results.len()
        }
        OutputMode::Human => {
            let results = search(query)?;
            write_human(&results, out)?;
            results.len()
        }
    };

    // The search itself succeeded; a journal failure only costs the entry
    if let Err(e) = state.history.append(HistoryEntry::record(query, total_results)) {
        log::warn!("Failed to save search history: {}", e);
    }
    Ok(total_results)
}

fn stream_events<W: Write>(query: &SearchQuery, out: &mut W) -> Result<usize> {
    let mut total_results = 0;
    for event in search_streaming(query)? {
        if let SearchEvent::Complete { total_results: n } = event {
            total_results = n;
        }
        serde_json::to_writer(&mut *out, &event)?;
        writeln!(out)?;
        out.flush().context("Failed to flush search event")?;
    }
    Ok(total_results)
}

fn write_human<W: Write>(results: &[FileResult], out: &mut W) -> Result<()> {
    if results.is_empty() {
        writeln!(out, "No matches found")?;
        return Ok(());
    }

    for result in results {
        writeln!(out, "{} ({} occurrences)", result.file_path, result.total_occurrences)?;
        for record in &result.matches {
            writeln!(out, "  {}", describe_match(record))?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Found matches in {} files", results.len())?;
    Ok(())
}

fn describe_match(record: &MatchRecord) -> String {
    match (&record.section, record.line_number) {
        (Some(section), Some(line)) => format!("[{}] {}: {}", section, line, record.content),
        (None, Some(line)) => format!("{}: {}", line, record.content),
        _ => record.content.clone(),
    }
}
