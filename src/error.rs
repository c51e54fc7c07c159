//! Error types for each concern of the crate

use std::path::PathBuf;
use thiserror::Error;

/// Rejections of a search request; raised before any file is touched
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query must not be empty")]
    EmptyQuery,
}

/// Why a document produced no text units
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("missing part `{0}`")]
    MissingPart(String),

    #[error("unsupported document: {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write history journal {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode history journal: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures of an AI capability; surfaced to callers as `{"error": ...}`
#[derive(Debug, Error)]
pub enum AiError {
    #[error("{0} not available")]
    Unavailable(&'static str),

    #[error("Could not read {0}")]
    Unreadable(PathBuf),

    #[error("{0}")]
    NoFaces(&'static str),

    #[error("{tool} failed: {message}")]
    Tool { tool: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("failed to launch editor `{command}`: {source}")]
    Editor {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open with default application: {0}")]
    Opener(#[from] opener::OpenError),
}
