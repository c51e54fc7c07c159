use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::vec;

use super::{enumerate_files, Matcher};
use crate::error::SearchError;
use crate::extractors::extract_matches;
use crate::models::{FileResult, SearchEvent, SearchQuery};

/// Emit a progress event after this many processed files
pub const PROGRESS_INTERVAL: usize = 10;

/// Run a search to completion and return every file with matches,
/// in enumeration order.
pub fn search(query: &SearchQuery) -> Result<Vec<FileResult>, SearchError> {
    let results = search_streaming(query)?
        .filter_map(|event| match event {
            SearchEvent::Result { data } => Some(data),
            _ => None,
        })
        .collect();
    Ok(results)
}

/// Start an incremental search.
///
/// Files are enumerated up front; each call to `next` on the returned stream
/// processes at most one file. Dropping the stream abandons the rest.
pub fn search_streaming(query: &SearchQuery) -> Result<SearchStream, SearchError> {
    if query.query.trim().is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let files = enumerate_files(&query.folders);
    log::info!("Searching {} files for {:?}", files.len(), query.query);
    Ok(SearchStream::new(query, files))
}

/// Search one file: filename first (when enabled), then its content
pub fn search_file(path: &Path, matcher: &Matcher, search_filenames: bool) -> Option<FileResult> {
    let mut matches = Vec::new();
    if search_filenames {
        matches.extend(matcher.match_filename(path));
    }
    matches.extend(extract_matches(path, matcher));
    FileResult::from_matches(path, matches)
}

/// Lazy, finite sequence of search events
pub struct SearchStream {
    matcher: Matcher,
    search_filenames: bool,
    files: vec::IntoIter<PathBuf>,
    total_files: usize,
    files_processed: usize,
    results_found: usize,
    pending: VecDeque<SearchEvent>,
    finished: bool,
}

impl SearchStream {
    fn new(query: &SearchQuery, files: Vec<PathBuf>) -> Self {
        let total_files = files.len();
        let mut pending = VecDeque::new();
        pending.push_back(SearchEvent::Status {
            total_files,
            message: format!("Found {} files to search", total_files),
        });

        Self {
            matcher: Matcher::new(&query.query, &query.options),
            search_filenames: query.options.search_filenames,
            files: files.into_iter(),
            total_files,
            files_processed: 0,
            results_found: 0,
            pending,
            finished: false,
        }
    }

    pub fn total_files(&self) -> usize {
        self.total_files
    }

    fn process(&mut self, path: &Path) {
        if let Some(result) = search_file(path, &self.matcher, self.search_filenames) {
            self.results_found += 1;
            self.pending.push_back(SearchEvent::Result { data: result });
        }

        self.files_processed += 1;
        if self.files_processed % PROGRESS_INTERVAL == 0 || self.files_processed == self.total_files {
            self.pending.push_back(SearchEvent::Progress {
                files_processed: self.files_processed,
                total_files: self.total_files,
                progress_percent: (self.files_processed * 100 / self.total_files) as u32,
                results_found: self.results_found,
            });
        }
    }
}

impl Iterator for SearchStream {
    type Item = SearchEvent;

    fn next(&mut self) -> Option<SearchEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }

            match self.files.next() {
                Some(path) => self.process(&path),
                None => {
                    log::info!(
                        "Search finished: {} of {} files matched",
                        self.results_found,
                        self.total_files
                    );
                    self.pending.push_back(SearchEvent::Complete {
                        total_results: self.results_found,
                    });
                    self.finished = true;
                }
            }
        }
    }
}
