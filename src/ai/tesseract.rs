//! OCR through the `tesseract` command-line tool

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use super::provider::{OcrOutput, TextBox, TextRecognizer};
use super::run_tool;
use crate::error::AiError;

/// Column layout of `tesseract ... tsv` output
const TSV_COLUMNS: usize = 12;

pub struct TesseractOcr {
    command: String,
    language: String,
}

impl TesseractOcr {
    /// Make sure the executable runs before handing out a handle
    pub fn detect(command: &str, language: &str) -> Result<Self, AiError> {
        let output = Command::new(command).arg("--version").output();
        match output {
            Ok(out) if out.status.success() => Ok(Self {
                command: command.to_string(),
                language: language.to_string(),
            }),
            Ok(out) => Err(AiError::Tool {
                tool: command.to_string(),
                message: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            }),
            Err(e) => Err(AiError::Tool {
                tool: command.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

impl TextRecognizer for TesseractOcr {
    fn recognize(&self, image: &Path) -> Result<OcrOutput, AiError> {
        if !image.is_file() {
            return Err(AiError::Unreadable(image.to_path_buf()));
        }

        let text = run_tool(&self.command, tesseract_args(image, &self.language, &[]))?;
        let tsv = run_tool(&self.command, tesseract_args(image, &self.language, &["tsv"]))?;

        Ok(OcrOutput {
            text,
            boxes: parse_tsv(&tsv),
        })
    }
}

fn tesseract_args<'a>(image: &'a Path, language: &'a str, extra: &[&'static str]) -> Vec<&'a OsStr> {
    let mut args = vec![
        image.as_os_str(),
        OsStr::new("stdout"),
        OsStr::new("-l"),
        OsStr::new(language),
    ];
    args.extend(extra.iter().map(|arg| OsStr::new(*arg)));
    args
}

/// Keep rows whose whole-number confidence is positive; structural rows
/// report -1 and a confidence below 1 counts as none
pub fn parse_tsv(tsv: &str) -> Vec<TextBox> {
    tsv.lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
            if cols.len() < TSV_COLUMNS - 1 {
                return None;
            }
            let confidence: f32 = cols[10].trim().parse().ok()?;
            if confidence.trunc() <= 0.0 {
                return None;
            }
            Some(TextBox {
                text: cols.get(11).map(|t| t.trim().to_string()).unwrap_or_default(),
                confidence,
                left: cols[6].parse().ok()?,
                top: cols[7].parse().ok()?,
                width: cols[8].parse().ok()?,
                height: cols[9].parse().ok()?,
            })
        })
        .collect()
}
