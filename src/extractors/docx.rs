use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use zip::ZipArchive;

use super::TextUnit;
use crate::error::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract paragraphs from a DOCX file
///
/// DOCX files are ZIP archives containing XML files.
/// The main document content is in word/document.xml; every `<w:p>` is one
/// unit, numbered in document order. Empty paragraphs still take a number.
pub fn extract_docx(path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
    let file = fs::File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let document = archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| ExtractError::MissingPart(DOCUMENT_PART.to_string()))?;

    let paragraphs = read_paragraphs(BufReader::new(document))?;
    Ok(paragraphs
        .into_iter()
        .enumerate()
        .map(|(idx, text)| TextUnit::new(idx + 1, text))
        .collect())
}

/// Stream document.xml and collect the text of each paragraph.
///
/// Paragraphs nested inside text boxes are closed (and emitted) before the
/// paragraph that hosts them. A text box appears twice in the markup, once
/// as the drawing and once as its `mc:Fallback` VML copy; the copy is skipped.
/// Tabs and breaks only count inside a run, so tab stop definitions in the
/// paragraph properties add nothing.
fn read_paragraphs<R: BufRead>(source: R) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::with_capacity(1024);
    let mut open: Vec<String> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut in_text = false;
    let mut run_depth = 0usize;
    let mut fallback_depth = 0usize;

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)?;
        if fallback_depth > 0 {
            match &event {
                Event::Start(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth += 1,
                Event::End(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                b"Fallback" => fallback_depth = 1,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" if run_depth > 0 => push_to_current(&mut open, "\t"),
                b"br" | b"cr" if run_depth > 0 => push_to_current(&mut open, "\n"),
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e.unescape()?;
                push_to_current(&mut open, &text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_to_current(open: &mut [String], text: &str) {
    if let Some(current) = open.last_mut() {
        current.push_str(text);
    }
}
