//! PPT (Legacy PowerPoint Binary) text extraction
//!
//! PowerPoint 97-2003 files are OLE Compound Documents. Slide text is kept in
//! the "PowerPoint Document" stream, inside the slide list container: each
//! SlidePersistAtom opens a slide and the text atoms that follow it are that
//! slide's text placeholders and boxes.

use cfb::CompoundFile;
use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::TextUnit;
use crate::error::ExtractError;
use crate::models::Section;

const RT_SLIDE_LIST_WITH_TEXT: u16 = 0x0FF0;
const RT_SLIDE_PERSIST_ATOM: u16 = 0x03F3;
const RT_TEXT_CHARS_ATOM: u16 = 0x0FA0;
const RT_TEXT_BYTES_ATOM: u16 = 0x0FA8;

const HEADER_LEN: usize = 8;
const CONTAINER_VERSION: u16 = 0x000F;
const MAX_DEPTH: usize = 16;

/// Extract per-shape text from a .ppt file, numbered by slide
pub fn extract_ppt(path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
    let file = File::open(path)?;
    let mut cfb = CompoundFile::open(file)?;

    let mut stream = cfb.open_stream("/PowerPoint Document")?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;

    let mut state = SlideText::default();
    walk_records(&data, false, 0, &mut state);
    Ok(state.units)
}

#[derive(Default)]
struct SlideText {
    slide: usize,
    /// Only the first slide list is read; later ones belong to older edits
    finished: bool,
    units: Vec<TextUnit>,
}

struct RecordHeader {
    version: u16,
    instance: u16,
    rec_type: u16,
    len: usize,
}

fn read_header(data: &[u8], offset: usize) -> Option<RecordHeader> {
    let raw = data.get(offset..offset + HEADER_LEN)?;
    let ver_instance = u16::from_le_bytes([raw[0], raw[1]]);
    Some(RecordHeader {
        version: ver_instance & 0x000F,
        instance: ver_instance >> 4,
        rec_type: u16::from_le_bytes([raw[2], raw[3]]),
        len: u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]) as usize,
    })
}

fn walk_records(data: &[u8], in_slide_list: bool, depth: usize, state: &mut SlideText) {
    if depth > MAX_DEPTH {
        return;
    }

    let mut offset = 0;
    while let Some(header) = read_header(data, offset) {
        if state.finished {
            return;
        }
        let body_start = offset + HEADER_LEN;
        let body_end = body_start.saturating_add(header.len).min(data.len());
        let body = &data[body_start..body_end];

        if header.version == CONTAINER_VERSION {
            let opens_slides = header.rec_type == RT_SLIDE_LIST_WITH_TEXT && header.instance == 0;
            walk_records(body, in_slide_list || opens_slides, depth + 1, state);
            if opens_slides && !state.units.is_empty() {
                state.finished = true;
            }
        } else if in_slide_list {
            match header.rec_type {
                RT_SLIDE_PERSIST_ATOM => state.slide += 1,
                RT_TEXT_CHARS_ATOM => push_text(state, decode_utf16le(body)),
                RT_TEXT_BYTES_ATOM => {
                    let (text, _, _) = WINDOWS_1252.decode(body);
                    push_text(state, text.into_owned());
                }
                _ => {}
            }
        }

        offset = body_end;
    }
}

fn push_text(state: &mut SlideText, raw: String) {
    if state.slide == 0 {
        return;
    }
    // paragraph and vertical-tab line breaks
    let text = raw.replace(['\r', '\u{b}'], "\n");
    state
        .units
        .push(TextUnit::new(state.slide, text).in_section(Section::Slide { number: state.slide }));
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
