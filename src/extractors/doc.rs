//! DOC (Legacy Word Binary) paragraph extraction
//!
//! Older .doc files (Word 97-2003) are OLE Compound Documents. The text lives
//! in the WordDocument stream, in pieces listed by the piece table (PlcPcd)
//! inside the Clx of the 0Table or 1Table stream. Each piece is either 8-bit
//! cp1252 or UTF-16LE. Paragraph marks (`\r`) separate the units.

use cfb::CompoundFile;
use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::TextUnit;
use crate::error::ExtractError;

/// FIB offsets (MS-DOC 2.5.1)
const FIB_FLAGS: usize = 0x000A;
const FIB_FC_MIN: usize = 0x0018;
const FIB_FC_MAC: usize = 0x001C;
const FIB_CCP_TEXT: usize = 0x004C;
const FIB_FC_CLX: usize = 0x01A2;
const FIB_LCB_CLX: usize = 0x01A6;
const FIB_MIN_LEN: usize = 0x0200;

/// fWhichTblStm: the piece table lives in 1Table instead of 0Table
const FLAG_WHICH_TABLE: u16 = 0x0200;

/// Clx entry types
const CLXT_PRC: u8 = 0x01;
const CLXT_PCDT: u8 = 0x02;

/// FcCompressed bit 30: the piece is 8-bit, stored at fc / 2
const FC_COMPRESSED: u32 = 0x4000_0000;
const PCD_LEN: usize = 8;

/// Extract paragraphs from a .doc file
pub fn extract_doc(path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
    let file = File::open(path)?;
    let mut cfb = CompoundFile::open(file)?;

    let word_doc = read_stream(&mut cfb, "/WordDocument")?;

    if word_doc.len() < FIB_MIN_LEN {
        return Err(ExtractError::Unsupported("WordDocument stream too short".to_string()));
    }

    let table_name = if read_u16_le(&word_doc, FIB_FLAGS) & FLAG_WHICH_TABLE != 0 {
        "/1Table"
    } else {
        "/0Table"
    };
    let table = match read_stream(&mut cfb, table_name) {
        Ok(table) => Some(table),
        Err(e) => {
            log::debug!("No {} stream in {:?}: {}", table_name, path, e);
            None
        }
    };

    let text = document_text(&word_doc, table.as_deref())
        .ok_or_else(|| ExtractError::Unsupported("no readable text".to_string()))?;

    Ok(split_paragraphs(&text)
        .into_iter()
        .enumerate()
        .map(|(idx, paragraph)| TextUnit::new(idx + 1, paragraph))
        .collect())
}

fn read_stream(cfb: &mut CompoundFile<File>, name: &str) -> std::io::Result<Vec<u8>> {
    let mut stream = cfb.open_stream(name)?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    Ok(data)
}

/// Main document text: piece table first, then the FIB range, then a raw scan
fn document_text(word_doc: &[u8], table: Option<&[u8]>) -> Option<String> {
    table
        .and_then(|table| text_from_pieces(word_doc, table))
        .or_else(|| text_from_fib(word_doc))
        .or_else(|| scan_utf16_runs(word_doc))
}

/// One entry of the piece table: character positions and where they are stored
#[derive(Debug, PartialEq)]
struct Piece {
    cp_start: usize,
    cp_end: usize,
    fc: usize,
    compressed: bool,
}

/// Assemble the main document text from the pieces listed in the Clx
fn text_from_pieces(word_doc: &[u8], table: &[u8]) -> Option<String> {
    let fc_clx = read_u32_le(word_doc, FIB_FC_CLX) as usize;
    let lcb_clx = read_u32_le(word_doc, FIB_LCB_CLX) as usize;
    let ccp_text = read_u32_le(word_doc, FIB_CCP_TEXT) as usize;
    if lcb_clx == 0 || ccp_text == 0 {
        return None;
    }

    let clx = table.get(fc_clx..fc_clx.checked_add(lcb_clx)?)?;
    let mut text = String::new();
    for piece in parse_piece_table(clx)? {
        // later pieces hold footnotes, headers and the like
        if piece.cp_start >= ccp_text {
            break;
        }
        let chars = piece.cp_end.min(ccp_text).saturating_sub(piece.cp_start);
        if piece.compressed {
            let bytes = word_doc.get(piece.fc..piece.fc + chars)?;
            let (decoded, _, _) = WINDOWS_1252.decode(bytes);
            text.push_str(&decoded);
        } else {
            let bytes = word_doc.get(piece.fc..piece.fc + chars * 2)?;
            text.push_str(&decode_utf16le(bytes)?);
        }
    }

    let cleaned = clean_extracted_text(&text);
    is_readable_text(&cleaned).then_some(cleaned)
}

/// Skip the Prc entries and read the PlcPcd that follows the Pcdt marker
fn parse_piece_table(clx: &[u8]) -> Option<Vec<Piece>> {
    let mut pos = 0;
    let plc = loop {
        match *clx.get(pos)? {
            CLXT_PRC => pos += 3 + read_u16_le(clx, pos + 1) as usize,
            CLXT_PCDT => {
                let lcb = read_u32_le(clx, pos + 1) as usize;
                break clx.get(pos + 5..(pos + 5).checked_add(lcb)?)?;
            }
            _ => return None,
        }
    };

    // n + 1 character positions, then n piece descriptors
    if plc.len() < 4 || (plc.len() - 4) % (4 + PCD_LEN) != 0 {
        return None;
    }
    let count = (plc.len() - 4) / (4 + PCD_LEN);
    let descriptors = (count + 1) * 4;

    let pieces = (0..count)
        .map(|i| {
            let fc = read_u32_le(plc, descriptors + i * PCD_LEN + 2);
            let compressed = fc & FC_COMPRESSED != 0;
            Piece {
                cp_start: read_u32_le(plc, i * 4) as usize,
                cp_end: read_u32_le(plc, (i + 1) * 4) as usize,
                fc: if compressed {
                    ((fc & !FC_COMPRESSED) / 2) as usize
                } else {
                    fc as usize
                },
                compressed,
            }
        })
        .collect();
    Some(pieces)
}

/// Read the FIB text range directly, for files without a usable piece table
fn text_from_fib(word_doc: &[u8]) -> Option<String> {
    let fc_min = read_u32_le(word_doc, FIB_FC_MIN) as usize;
    let fc_mac = read_u32_le(word_doc, FIB_FC_MAC) as usize;
    let ccp_text = read_u32_le(word_doc, FIB_CCP_TEXT) as usize;

    if fc_min == 0 || fc_min >= word_doc.len() || ccp_text == 0 {
        return None;
    }

    // fExtChar is set by every Word 97+ writer, so the width comes from the
    // byte span: two bytes per character when it covers 2 * ccpText
    let wide = fc_mac.saturating_sub(fc_min) >= ccp_text * 2;
    let text = if wide {
        let end = (fc_min + ccp_text * 2).min(word_doc.len());
        decode_utf16le(&word_doc[fc_min..end])?
    } else {
        let end = (fc_min + ccp_text).min(word_doc.len());
        let (decoded, _, _) = WINDOWS_1252.decode(&word_doc[fc_min..end]);
        decoded.into_owned()
    };

    let cleaned = clean_extracted_text(&text);
    is_readable_text(&cleaned).then_some(cleaned)
}

/// Fallback: collect runs of printable UTF-16LE characters anywhere in the stream
fn scan_utf16_runs(data: &[u8]) -> Option<String> {
    let mut result = String::new();
    let mut run: Vec<u16> = Vec::new();

    for chunk in data.chunks_exact(2) {
        let unit = u16::from_le_bytes([chunk[0], chunk[1]]);
        if is_printable_utf16(unit) {
            run.push(unit);
            continue;
        }
        if run.len() > 2 {
            result.push_str(&String::from_utf16_lossy(&run));
            result.push('\r');
        }
        run.clear();
    }
    if run.len() > 2 {
        result.push_str(&String::from_utf16_lossy(&run));
    }

    let cleaned = clean_extracted_text(&result);
    (cleaned.len() > 50).then_some(cleaned)
}

fn is_printable_utf16(unit: u16) -> bool {
    matches!(unit, 0x0009 | 0x000A | 0x000D | 0x0020..=0x007E | 0x00A0..=0x024F | 0x0370..=0x06FF | 0x2000..=0x206F)
}

fn decode_utf16le(bytes: &[u8]) -> Option<String> {
    if bytes.len() < 2 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();
    Some(String::from_utf16_lossy(&units))
}

/// Drop control characters and field codes but keep paragraph marks
fn clean_extracted_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            // cell and row marks end a paragraph too
            '\u{7}' => '\r',
            '\u{b}' => '\n',
            _ => c,
        })
        .filter(|c| !c.is_control() || matches!(c, '\r' | '\n' | '\t'))
        .collect()
}

fn split_paragraphs(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_readable_text(text: &str) -> bool {
    let total = text.chars().count();
    if total < 2 {
        return false;
    }
    let readable = text.chars().filter(|c| c.is_alphanumeric() || c.is_whitespace()).count();
    (readable as f64 / total as f64) > 0.3
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    match data.get(offset..offset + 2) {
        Some(b) => u16::from_le_bytes([b[0], b[1]]),
        None => 0,
    }
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    match data.get(offset..offset + 4) {
        Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        None => 0,
    }
}
