//! Document content extractors
//!
//! Each supported format turns a file into an ordered list of text units
//! (lines, paragraphs, cells, shapes or page lines) that the matcher tests:
//! - TXT (plain text)
//! - DOCX / DOC (Microsoft Word)
//! - XLSX / XLS (Microsoft Excel)
//! - PPTX / PPT (Microsoft PowerPoint)
//! - PDF

mod doc;
mod docx;
mod pdf;
mod ppt;
mod pptx;
mod text;
mod xlsx;

pub use doc::extract_doc;
pub use docx::extract_docx;
pub use pdf::extract_pdf;
pub use ppt::extract_ppt;
pub use pptx::extract_pptx;
pub use text::extract_text;
pub use xlsx::extract_spreadsheet;

use std::path::Path;

use crate::error::ExtractError;
use crate::models::{MatchRecord, Section};
use crate::search::Matcher;

/// Supported file extensions
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "docx", "doc", "xlsx", "xls", "pptx", "ppt", "pdf"];

/// The smallest span of a document the query is tested against
#[derive(Debug, Clone, PartialEq)]
pub struct TextUnit {
    pub line_number: usize,
    pub section: Option<Section>,
    pub text: String,
}

impl TextUnit {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            section: None,
            text: text.into(),
        }
    }

    pub fn in_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }
}

/// Turns one document format into text units
pub trait TextExtractor: Sync {
    fn units(&self, path: &Path) -> Result<Vec<TextUnit>, ExtractError>;

    /// Whether previews keep the whole unit instead of the usual 200 characters
    fn full_preview(&self, _exact_match: bool) -> bool {
        false
    }
}

/// Format families, selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Word,
    Spreadsheet,
    Presentation,
    Pdf,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "docx" | "doc" => Some(Self::Word),
            "xlsx" | "xls" => Some(Self::Spreadsheet),
            "pptx" | "ppt" => Some(Self::Presentation),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extractor(self) -> &'static dyn TextExtractor {
        match self {
            Self::Text => &PlainText,
            Self::Word => &WordDocument,
            Self::Spreadsheet => &Spreadsheet,
            Self::Presentation => &SlideDeck,
            Self::Pdf => &PaginatedDocument,
        }
    }

    /// File type label used in listings
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Word => "word",
            Self::Spreadsheet => "excel",
            Self::Presentation => "powerpoint",
            Self::Pdf => "pdf",
        }
    }
}

/// Check if extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// Run the extractor for `path` and keep the units that match.
///
/// Extraction failures never escape: the file simply contributes no matches.
pub fn extract_matches(path: &Path, matcher: &Matcher) -> Vec<MatchRecord> {
    let Some(format) = DocumentFormat::from_path(path) else {
        return Vec::new();
    };
    let extractor = format.extractor();

    let units = match extractor.units(path) {
        Ok(units) => units,
        Err(e) => {
            log::warn!("Error reading {} {:?}: {}", format.label(), path, e);
            return Vec::new();
        }
    };

    let full_preview = extractor.full_preview(matcher.exact_match());
    units
        .into_iter()
        .filter_map(|unit| matcher.match_unit(path, unit, full_preview))
        .collect()
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

struct PlainText;

impl TextExtractor for PlainText {
    fn units(&self, path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
        extract_text(path)
    }

    fn full_preview(&self, exact_match: bool) -> bool {
        exact_match
    }
}

struct WordDocument;

impl TextExtractor for WordDocument {
    fn units(&self, path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
        if has_extension(path, "doc") {
            extract_doc(path)
        } else {
            extract_docx(path)
        }
    }
}

struct Spreadsheet;

impl TextExtractor for Spreadsheet {
    fn units(&self, path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
        extract_spreadsheet(path)
    }
}

struct SlideDeck;

impl TextExtractor for SlideDeck {
    fn units(&self, path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
        if has_extension(path, "ppt") {
            extract_ppt(path)
        } else {
            extract_pptx(path)
        }
    }
}

struct PaginatedDocument;

impl TextExtractor for PaginatedDocument {
    fn units(&self, path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
        extract_pdf(path)
    }
}
