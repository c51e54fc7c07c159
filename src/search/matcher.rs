use std::path::Path;

use crate::extractors::TextUnit;
use crate::models::{MatchRecord, SearchOptions};

/// Longest preview kept for a content match, in characters
pub const PREVIEW_CHARS: usize = 200;

/// Substring matcher for one query under one set of options
#[derive(Debug, Clone)]
pub struct Matcher {
    needle: String,
    case_sensitive: bool,
    exact_match: bool,
}

impl Matcher {
    pub fn new(query: &str, options: &SearchOptions) -> Self {
        let needle = if options.case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        Self {
            needle,
            case_sensitive: options.case_sensitive,
            exact_match: options.exact_match,
        }
    }

    pub fn exact_match(&self) -> bool {
        self.exact_match
    }

    /// Non-overlapping occurrences of the query in `text`, folding case if asked
    pub fn count(&self, text: &str) -> usize {
        if self.needle.is_empty() {
            return 0;
        }
        if self.case_sensitive {
            text.matches(self.needle.as_str()).count()
        } else {
            text.to_lowercase().matches(self.needle.as_str()).count()
        }
    }

    /// Test one extracted unit; the preview keeps the original casing
    pub fn match_unit(&self, path: &Path, unit: TextUnit, full_preview: bool) -> Option<MatchRecord> {
        let occurrences = self.count(&unit.text);
        if occurrences == 0 {
            return None;
        }

        let stripped = unit.text.trim();
        let content = if full_preview {
            stripped.to_string()
        } else {
            preview(stripped, PREVIEW_CHARS)
        };

        Some(MatchRecord {
            file_path: path.to_string_lossy().to_string(),
            line_number: Some(unit.line_number),
            section: unit.section,
            content,
            occurrences,
        })
    }

    /// Test the file's basename; hits carry no line number
    pub fn match_filename(&self, path: &Path) -> Option<MatchRecord> {
        let filename = path.file_name()?.to_string_lossy();
        let occurrences = self.count(&filename);
        if occurrences == 0 {
            return None;
        }

        Some(MatchRecord {
            file_path: path.to_string_lossy().to_string(),
            line_number: None,
            section: None,
            content: format!("Filename match: {}", filename),
            occurrences,
        })
    }
}

/// First `max_chars` characters of `text`, never splitting a character
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
