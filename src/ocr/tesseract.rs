use std::path::Path;
use std::process::Command;

use crate::core::geometry::Rect;
use crate::core::model::{GroupKey, Token};
use crate::error::{Result, ScanError};
use crate::ocr::Recognizer;

/// Tesseract's TSV output: one row per element, words at level 5. Structural
/// rows carry confidence -1 and empty text and are filtered downstream.
const TSV_FIELDS: usize = 12;

#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    langs: String,
}

impl TesseractRecognizer {
    pub fn new() -> Self {
        Self {
            langs: "spa".to_string(),
        }
    }

    pub fn with_langs(mut self, langs: impl Into<String>) -> Self {
        self.langs = langs.into();
        self
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image: &Path, page_idx: usize) -> Result<Vec<Token>> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.langs)
            .arg("--oem")
            .arg("1")
            .arg("--psm")
            .arg("3")
            .arg("tsv")
            .output()
            .map_err(|e| {
                ScanError::recognize(page_idx, format!("failed to invoke tesseract: {e}"))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::recognize(
                page_idx,
                format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_tsv(&stdout, page_idx)
    }
}

/// Parse tesseract TSV into tokens. Columns: level, page_num, block_num,
/// par_num, line_num, word_num, left, top, width, height, conf, text.
fn parse_tsv(tsv: &str, page_idx: usize) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    for row in tsv.lines().skip(1) {
        if row.trim().is_empty() {
            continue;
        }
        // splitn keeps any tab inside the text column from shifting fields
        let fields: Vec<&str> = row.splitn(TSV_FIELDS, '\t').collect();
        if fields.len() < TSV_FIELDS {
            continue;
        }
        let block = parse_field(fields[2], "block_num", page_idx)?;
        let par = parse_field(fields[3], "par_num", page_idx)?;
        let line = parse_field(fields[4], "line_num", page_idx)?;
        let x = parse_field(fields[6], "left", page_idx)?;
        let y = parse_field(fields[7], "top", page_idx)?;
        let width = parse_field(fields[8], "width", page_idx)?;
        let height = parse_field(fields[9], "height", page_idx)?;
        let confidence: f32 = fields[10].parse().map_err(|_| {
            ScanError::recognize(page_idx, format!("bad conf field: {:?}", fields[10]))
        })?;

        tokens.push(Token {
            text: fields[11].to_string(),
            confidence,
            rect: Rect::new(x, y, width, height),
            group: GroupKey::new(block, par, line),
        });
    }
    Ok(tokens)
}

fn parse_field(raw: &str, name: &str, page_idx: usize) -> Result<u32> {
    raw.parse().map_err(|_| {
        ScanError::recognize(page_idx, format!("bad {name} field: {raw:?}"))
    })
}
