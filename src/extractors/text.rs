use encoding_rs::UTF_8;
use std::fs;
use std::path::Path;

use super::TextUnit;
use crate::error::ExtractError;

/// Extract lines from plain text files
///
/// The byte order mark decides the encoding when present, UTF-8 otherwise.
/// Malformed sequences are replaced rather than failing the whole file.
pub fn extract_text(path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
    let bytes = fs::read(path)?;
    let (content, _, _) = UTF_8.decode(&bytes);

    Ok(content
        .lines()
        .enumerate()
        .map(|(idx, line)| TextUnit::new(idx + 1, line))
        .collect())
}
