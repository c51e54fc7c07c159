use encoding_rs::WINDOWS_1252;
use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

use super::TextUnit;
use crate::error::ExtractError;
use crate::models::Section;

/// Extract page lines from a PDF file
///
/// This extracts text from "digital-native" PDFs that contain
/// selectable text. Scanned documents (image-only PDFs) yield no
/// units - no OCR is performed. Encrypted files fail to load.
///
/// Each line of a page's text is one unit; `line_number` restarts at 1 on
/// every page and the page number is carried in the section.
pub fn extract_pdf(path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
    let doc = Document::load(path)?;
    let mut units = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let lines = match page_lines(&doc, page_id) {
            Ok(lines) => lines,
            Err(e) => {
                // One unreadable page should not hide the rest of the document
                log::debug!("Skipping page {} of {:?}: {}", page_number, path, e);
                continue;
            }
        };

        let page = page_number as usize;
        units.extend(lines.into_iter().enumerate().map(|(idx, line)| {
            TextUnit::new(idx + 1, line).in_section(Section::Page { number: page })
        }));
    }

    Ok(units)
}

/// Text lines of one page, in content-stream order
///
/// A line ends at every text-positioning operator that moves down (`Td`,
/// `TD` with a vertical offset, `T*`, `'`, `"`) and at the end of each text
/// object.
fn page_lines(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
    let encodings: BTreeMap<Vec<u8>, Encoding> = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .filter_map(|(name, font)| font.get_font_encoding(doc).ok().map(|encoding| (name, encoding)))
        .collect();
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut lines = LineBuffer::default();
    let mut current: Option<&Encoding> = None;
    for operation in &content.operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "Tf" => {
                current = operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Td" | "TD" => {
                let dy = operands.get(1).and_then(|y| y.as_float().ok()).unwrap_or(0.0);
                if dy != 0.0 {
                    lines.break_line();
                }
            }
            "T*" | "ET" => lines.break_line(),
            "Tj" | "TJ" => lines.push_operands(current, operands),
            "'" | "\"" => {
                lines.break_line();
                // `"` carries word and character spacing ahead of the string
                lines.push_operands(current, operands.last().map(std::slice::from_ref).unwrap_or_default());
            }
            _ => {}
        }
    }
    lines.break_line();

    Ok(lines.done)
}

#[derive(Default)]
struct LineBuffer {
    line: String,
    done: Vec<String>,
}

impl LineBuffer {
    fn break_line(&mut self) {
        let line = self.line.trim();
        if !line.is_empty() {
            self.done.push(line.to_string());
        }
        self.line.clear();
    }

    fn push_operands(&mut self, encoding: Option<&Encoding>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => self.line.push_str(&decode_string(encoding, bytes)),
                Object::Array(items) => self.push_operands(encoding, items),
                // large negative kerning in a TJ array is a word gap
                Object::Integer(i) if *i < -100 => self.line.push(' '),
                Object::Real(r) if *r < -100.0 => self.line.push(' '),
                _ => {}
            }
        }
    }
}

/// Decode with the font's encoding, or as WinAnsi when the font has none
fn decode_string(encoding: Option<&Encoding>, bytes: &[u8]) -> String {
    if let Some(text) = encoding.and_then(|encoding| Document::decode_text(encoding, bytes).ok()) {
        return text;
    }
    let (decoded, _, _) = WINDOWS_1252.decode(bytes);
    decoded.into_owned()
}
