//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Builder for a folder of test documents
pub struct DocsBuilder {
    temp_dir: TempDir,
}

impl DocsBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write raw bytes, creating parent directories
    pub fn with_file(self, name: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.file(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write file");
        self
    }

    pub fn with_docx(self, name: &str, paragraphs: &[&str]) -> Self {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
            .collect();
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body
        );
        self.with_zip(name, &[("word/document.xml", document)])
    }

    /// One shape per entry; `\n` separates paragraphs within a shape
    pub fn with_pptx(self, name: &str, slides: &[Vec<&str>]) -> Self {
        let parts: Vec<(String, String)> = slides
            .iter()
            .enumerate()
            .map(|(i, shapes)| (format!("ppt/slides/slide{}.xml", i + 1), slide_xml(shapes)))
            .collect();
        let parts: Vec<(&str, String)> = parts.iter().map(|(n, x)| (n.as_str(), x.clone())).collect();
        self.with_zip(name, &parts)
    }

    /// Sheets of string cells; every row is written as-is
    pub fn with_xlsx(self, name: &str, sheets: &[(&str, Vec<Vec<&str>>)]) -> Self {
        let mut shared: Vec<String> = Vec::new();
        let mut parts: Vec<(String, String)> = Vec::new();
        let mut sheet_entries = String::new();
        let mut rels = String::new();

        for (i, (sheet_name, rows)) in sheets.iter().enumerate() {
            let n = i + 1;
            sheet_entries.push_str(&format!(r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#, sheet_name, n, n));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                n, n
            ));

            let mut data = String::new();
            for (r, row) in rows.iter().enumerate() {
                data.push_str(&format!(r#"<row r="{}">"#, r + 1));
                for (c, value) in row.iter().enumerate() {
                    let col = (b'A' + c as u8) as char;
                    shared.push(value.to_string());
                    data.push_str(&format!(
                        r#"<c r="{}{}" t="s"><v>{}</v></c>"#,
                        col,
                        r + 1,
                        shared.len() - 1
                    ));
                }
                data.push_str("</row>");
            }
            parts.push((
                format!("xl/worksheets/sheet{}.xml", n),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    data
                ),
            ));
        }

        let strings: String = shared.iter().map(|s| format!("<si><t>{}</t></si>", s)).collect();
        parts.push((
            "xl/sharedStrings.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
                shared.len(),
                strings
            ),
        ));
        parts.push((
            "xl/workbook.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
                sheet_entries
            ),
        ));
        parts.push((
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                rels
            ),
        ));
        parts.push((
            "[Content_Types].xml".to_string(),
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#
                .to_string(),
        ));

        let parts: Vec<(&str, String)> = parts.iter().map(|(n, x)| (n.as_str(), x.clone())).collect();
        self.with_zip(name, &parts)
    }

    /// Single-page PDF with one line of Courier text
    pub fn with_pdf(self, name: &str, text: &str) -> Self {
        self.with_pdf_lines(name, &[text])
    }

    /// Single-page PDF with every line in one text object, each moved down by `Td`
    pub fn with_pdf_lines(self, name: &str, lines: &[&str]) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-28).into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        operations.push(Operation::new("ET", vec![]));
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("Failed to encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc.save(self.file(name)).expect("Failed to save pdf");
        self
    }

    /// Word 97 document: one 8-bit piece, paragraphs ended by `\r`
    pub fn with_doc(self, name: &str, paragraphs: &[&str]) -> Self {
        const TEXT_AT: u32 = 0x400;
        let text: Vec<u8> = paragraphs.iter().flat_map(|p| p.bytes().chain(Some(b'\r'))).collect();
        let ccp = text.len() as u32;

        let mut clx = vec![0x02];
        clx.extend_from_slice(&16u32.to_le_bytes());
        for value in [0, ccp] {
            clx.extend_from_slice(&value.to_le_bytes());
        }
        clx.extend_from_slice(&[0, 0]);
        clx.extend_from_slice(&(0x4000_0000 | (TEXT_AT * 2)).to_le_bytes());
        clx.extend_from_slice(&[0, 0]);

        let mut word_doc = vec![0u8; TEXT_AT as usize];
        word_doc[0..2].copy_from_slice(&0xA5ECu16.to_le_bytes());
        // fExtChar set, piece table in 0Table
        word_doc[0x0A..0x0C].copy_from_slice(&0x1000u16.to_le_bytes());
        for (offset, value) in [
            (0x18, TEXT_AT),
            (0x1C, TEXT_AT + ccp),
            (0x4C, ccp),
            (0x1A2, 0),
            (0x1A6, clx.len() as u32),
        ] {
            word_doc[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        }
        word_doc.extend(text);

        self.with_compound(name, &[("/WordDocument", word_doc), ("/0Table", clx)])
    }

    /// PowerPoint 97 deck: one text atom per entry, grouped by slide
    pub fn with_ppt(self, name: &str, slides: &[Vec<&str>]) -> Self {
        let mut slide_list = Vec::new();
        for shapes in slides {
            slide_list.extend(ppt_record(0x0, 0x03F3, &[0; 20]));
            for text in shapes {
                let utf16: Vec<u8> = text.replace('\n', "\r").encode_utf16().flat_map(u16::to_le_bytes).collect();
                slide_list.extend(ppt_record(0x0, 0x0FA0, &utf16));
            }
        }
        let document = ppt_record(0xF, 0x03E8, &ppt_record(0xF, 0x0FF0, &slide_list));
        self.with_compound(name, &[("/PowerPoint Document", document)])
    }

    /// BIFF8 workbook of label cells, one sheet per entry
    pub fn with_xls(self, name: &str, sheets: &[(&str, Vec<Vec<&str>>)]) -> Self {
        let sheet_streams: Vec<Vec<u8>> = sheets
            .iter()
            .map(|(_, rows)| {
                let mut stream = biff_record(0x0809, &biff_bof(0x0010));
                for (r, row) in rows.iter().enumerate() {
                    for (c, value) in row.iter().enumerate() {
                        let mut label = Vec::new();
                        for field in [r as u16, c as u16, 0, value.len() as u16] {
                            label.extend_from_slice(&field.to_le_bytes());
                        }
                        label.push(0);
                        label.extend_from_slice(value.as_bytes());
                        stream.extend(biff_record(0x0204, &label));
                    }
                }
                stream.extend(biff_record(0x000A, &[]));
                stream
            })
            .collect();

        let globals_len = 20 + sheets.iter().map(|(n, _)| 4 + 8 + n.len()).sum::<usize>() + 4;
        let mut workbook = biff_record(0x0809, &biff_bof(0x0005));
        let mut position = globals_len;
        for ((sheet_name, _), stream) in sheets.iter().zip(&sheet_streams) {
            let mut bound = (position as u32).to_le_bytes().to_vec();
            bound.extend_from_slice(&[0, 0, sheet_name.len() as u8, 0]);
            bound.extend_from_slice(sheet_name.as_bytes());
            workbook.extend(biff_record(0x0085, &bound));
            position += stream.len();
        }
        workbook.extend(biff_record(0x000A, &[]));
        for stream in sheet_streams {
            workbook.extend(stream);
        }

        self.with_compound(name, &[("/Workbook", workbook)])
    }

    fn with_compound(self, name: &str, streams: &[(&str, Vec<u8>)]) -> Self {
        let mut compound = cfb::create(self.file(name)).expect("Failed to create compound file");
        for (stream_name, data) in streams {
            let mut stream = compound.create_stream(stream_name).expect("Failed to create stream");
            stream.write_all(data).expect("Failed to write stream");
            stream.flush().expect("Failed to flush stream");
        }
        compound.flush().expect("Failed to flush compound file");
        self
    }

    fn with_zip(self, name: &str, parts: &[(&str, String)]) -> Self {
        let file = fs::File::create(self.file(name)).expect("Failed to create archive");
        let mut zip = ZipWriter::new(file);
        for (part, content) in parts {
            zip.start_file(*part, FileOptions::default()).expect("Failed to start part");
            zip.write_all(content.as_bytes()).expect("Failed to write part");
        }
        zip.finish().expect("Failed to finish archive");
        self
    }
}

fn ppt_record(version: u16, rec_type: u16, body: &[u8]) -> Vec<u8> {
    let mut out = version.to_le_bytes().to_vec();
    out.extend_from_slice(&rec_type.to_le_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    out
}

fn biff_record(rec_type: u16, body: &[u8]) -> Vec<u8> {
    let mut out = rec_type.to_le_bytes().to_vec();
    out.extend_from_slice(&(body.len() as u16).to_le_bytes());
    out.extend_from_slice(body);
    out
}

/// BIFF8 BOF body: 0x0005 opens the globals, 0x0010 a worksheet
fn biff_bof(substream: u16) -> Vec<u8> {
    let mut body = 0x0600u16.to_le_bytes().to_vec();
    body.extend_from_slice(&substream.to_le_bytes());
    body.resize(16, 0);
    body
}

fn slide_xml(shapes: &[&str]) -> String {
    let body: String = shapes
        .iter()
        .map(|text| {
            let paragraphs: String = text
                .split('\n')
                .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
                .collect();
            format!("<p:sp><p:nvSpPr/><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>", paragraphs)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
        body
    )
}
