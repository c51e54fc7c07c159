//! Search functionality
//!
//! This module provides search capabilities:
//! - Folder enumeration filtered to supported formats
//! - Substring matching of text units and filenames
//! - Batch and streaming search over one shared core
//! - Search history journal

mod aggregator;
mod enumerator;
mod history;
mod matcher;

pub use aggregator::{search, search_file, search_streaming, SearchStream, PROGRESS_INTERVAL};
pub use enumerator::enumerate_files;
pub use history::{HistoryLog, MAX_HISTORY_ENTRIES};
pub use matcher::{preview, Matcher, PREVIEW_CHARS};
