use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Flags that shape how a query is matched
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SearchOptions {
    /// Accepted for compatibility; only widens the plain-text preview
    pub exact_match: bool,
    pub case_sensitive: bool,
    /// Also test each file's basename against the query
    pub search_filenames: bool,
}

/// A search request: what to look for and where
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchQuery {
    pub query: String,
    pub folders: Vec<PathBuf>,
    #[serde(flatten)]
    pub options: SearchOptions,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, folders: Vec<PathBuf>) -> Self {
        Self {
            query: query.into(),
            folders,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }
}

/// Sub-document position of a match (sheet, slide or page)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Section {
    Sheet { name: String },
    Slide { number: usize },
    Page { number: usize },
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Sheet { name } => write!(f, "Sheet: {}", name),
            Section::Slide { number } => write!(f, "Slide: {}", number),
            Section::Page { number } => write!(f, "Page: {}", number),
        }
    }
}

/// One matching text unit (or a filename hit) within a file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchRecord {
    pub file_path: String,
    /// Absent for filename matches
    pub line_number: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    /// Preview of the matching unit, original casing
    pub content: String,
    pub occurrences: usize,
}

impl MatchRecord {
    /// Path with its section label, e.g. `report.xlsx (Sheet: Q1)`
    pub fn display_path(&self) -> String {
        match &self.section {
            Some(section) => format!("{} ({})", self.file_path, section),
            None => self.file_path.clone(),
        }
    }
}

/// All matches found in a single file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FileResult {
    pub file_path: String,
    pub total_occurrences: usize,
    pub matches: Vec<MatchRecord>,
}

impl FileResult {
    /// Build a result for `path`; `None` when there is nothing to report
    pub fn from_matches(path: &Path, matches: Vec<MatchRecord>) -> Option<Self> {
        if matches.is_empty() {
            return None;
        }
        Some(Self {
            file_path: path.to_string_lossy().to_string(),
            total_occurrences: matches.iter().map(|m| m.occurrences).sum(),
            matches,
        })
    }
}

/// Events produced by a streaming search, one JSON object per line on the wire
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchEvent {
    Status {
        total_files: usize,
        message: String,
    },
    Result {
        data: FileResult,
    },
    Progress {
        files_processed: usize,
        total_files: usize,
        progress_percent: u32,
        results_found: usize,
    },
    Complete {
        total_results: usize,
    },
}

/// Search history entry, laid out the way the journal stores it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryEntry {
    #[serde(with = "journal_timestamp")]
    pub timestamp: NaiveDateTime,
    pub query: String,
    pub folders: Vec<String>,
    #[serde(alias = "result_count")]
    pub results_count: usize,
    #[serde(flatten)]
    pub options: SearchOptions,
}

impl HistoryEntry {
    /// Stamp a finished search with the current local time
    pub fn record(query: &SearchQuery, results_count: usize) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            query: query.query.clone(),
            folders: query
                .folders
                .iter()
                .map(|f| f.to_string_lossy().to_string())
                .collect(),
            results_count,
            options: query.options,
        }
    }
}

mod journal_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
