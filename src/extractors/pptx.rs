use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use zip::ZipArchive;

use super::TextUnit;
use crate::error::ExtractError;
use crate::models::Section;

/// Extract shape text from a PPTX file
///
/// PPTX files are ZIP archives containing XML files.
/// Slides are stored in ppt/slides/slide1.xml, slide2.xml, etc.
/// Every `<p:sp>` carrying a text body is one unit; its paragraphs are
/// joined with newlines and the unit is numbered by its slide.
pub fn extract_pptx(path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
    let file = fs::File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut units = Vec::new();

    // Direct access by the known slide naming pattern, stop at the first gap
    let mut slide_num = 1;
    loop {
        let slide_name = format!("ppt/slides/slide{}.xml", slide_num);
        let Ok(slide_file) = archive.by_name(&slide_name) else {
            break;
        };

        for text in read_shape_texts(BufReader::new(slide_file))? {
            units.push(TextUnit::new(slide_num, text).in_section(Section::Slide { number: slide_num }));
        }
        slide_num += 1;
    }

    if slide_num == 1 {
        return Err(ExtractError::MissingPart("ppt/slides/slide1.xml".to_string()));
    }
    Ok(units)
}

#[derive(Default)]
struct OpenShape {
    has_text_body: bool,
    paragraphs: Vec<String>,
}

impl OpenShape {
    fn push_text(&mut self, text: &str) {
        match self.paragraphs.last_mut() {
            Some(paragraph) => paragraph.push_str(text),
            None => self.paragraphs.push(text.to_string()),
        }
    }
}

/// Collect the text of every text-bearing shape of one slide, in tree order
fn read_shape_texts<R: BufRead>(source: R) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::with_capacity(512);
    let mut shapes: Vec<OpenShape> = Vec::new();
    let mut texts = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" => shapes.push(OpenShape::default()),
                b"txBody" => {
                    if let Some(shape) = shapes.last_mut() {
                        shape.has_text_body = true;
                    }
                }
                b"p" => {
                    if let Some(shape) = shapes.last_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(shape) = shapes.last_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                b"br" => {
                    if let Some(shape) = shapes.last_mut() {
                        shape.push_text("\n");
                    }
                }
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e.unescape()?;
                if let Some(shape) = shapes.last_mut() {
                    shape.push_text(&text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"sp" => {
                    if let Some(shape) = shapes.pop() {
                        if shape.has_text_body {
                            texts.push(shape.paragraphs.join("\n"));
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(texts)
}
