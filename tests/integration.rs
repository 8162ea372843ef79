use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use proptest::prelude::*;

use scanclean::core::geometry::Rect;
use scanclean::core::model::{GroupKey, Token};
use scanclean::error::{Result, ScanError};
use scanclean::ocr::{Rasterizer, Recognizer, RenderedPage};
use scanclean::pipeline::{process, PipelineConfig};
use scanclean::text::{normalize, NormalizeOptions};

fn temp_output_dir(prefix: &str) -> PathBuf {
    let mut out = std::env::temp_dir();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    let pid = std::process::id();
    out.push(format!("{prefix}-{pid}-{now}"));
    out
}

/// Serves pre-built page images without touching poppler.
struct FakeRasterizer {
    pages: Vec<RenderedPage>,
}

impl FakeRasterizer {
    fn with_page_heights(heights: &[u32]) -> Self {
        let pages = heights
            .iter()
            .enumerate()
            .map(|(i, &height)| RenderedPage {
                path: PathBuf::from(format!("page-{}.png", i + 1)),
                width: 2480,
                height,
            })
            .collect();
        Self { pages }
    }
}

impl Rasterizer for FakeRasterizer {
    fn render_pages(&self, _pdf_path: &Path) -> Result<Vec<RenderedPage>> {
        Ok(self.pages.clone())
    }
}

/// Serves scripted tokens per page, optionally failing on one page.
struct FakeRecognizer {
    per_page: Vec<Vec<Token>>,
    fail_on: Option<usize>,
}

impl Recognizer for FakeRecognizer {
    fn recognize(&self, _image: &Path, page_idx: usize) -> Result<Vec<Token>> {
        if self.fail_on == Some(page_idx) {
            return Err(ScanError::recognize(page_idx, "engine unavailable"));
        }
        Ok(self.per_page[page_idx].clone())
    }
}

/// A row of word tokens on the given line key, laid out left to right.
fn line_tokens(words: &[&str], block: u32, line: u32, y: u32, height: u32) -> Vec<Token> {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| Token {
            text: word.to_string(),
            confidence: 90.0,
            rect: Rect::new(200 + 150 * i as u32, y, 120, height),
            group: GroupKey::new(block, 1, line),
        })
        .collect()
}

#[test]
fn synthetic_two_page_document_end_to_end() -> Result<()> {
    let out_dir = temp_output_dir("scanclean-e2e");
    fs::create_dir_all(&out_dir).unwrap();
    let output = out_dir.join("libro.txt");

    // Page 1: two body lines, a page number, and a numbered footnote in the
    // bottom band (page height 1000, so the band starts at y = 780).
    let mut page1 = Vec::new();
    page1.extend(line_tokens(&["El", "señor", "dijo:"], 1, 1, 100, 40));
    page1.extend(line_tokens(&["que", "todo", "iba", "bien."], 1, 2, 150, 40));
    page1.extend(line_tokens(&["17"], 2, 1, 960, 40));
    page1.extend(line_tokens(&["2.", "nota", "al", "pie"], 3, 1, 900, 40));

    // Page 2: one body line plus an unrecognized structural token.
    let mut page2 = line_tokens(&["Continuó", "así."], 1, 1, 120, 40);
    page2.push(Token {
        text: String::new(),
        confidence: -1.0,
        rect: Rect::new(0, 0, 2480, 1000),
        group: GroupKey::new(0, 0, 0),
    });

    let rasterizer = FakeRasterizer::with_page_heights(&[1000, 1000]);
    let recognizer = FakeRecognizer {
        per_page: vec![page1, page2],
        fail_on: None,
    };

    let mut config = PipelineConfig::new(PathBuf::from("libro.pdf"), output.clone());
    config.debug = true;
    process(&rasterizer, &recognizer, &config)?;

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text, "El señor dijo:\nque todo iba bien.\nContinuó así.");

    let trace_path = out_dir.join("libro.txt.pages.json");
    let trace = fs::read_to_string(&trace_path).unwrap();
    assert!(trace.contains("nota al pie"));
    assert!(trace.contains("\"kept\""));

    let _ = fs::remove_dir_all(&out_dir);
    Ok(())
}

#[test]
fn footnote_marker_is_stripped_inline_but_kept_lines_merge() -> Result<()> {
    let out_dir = temp_output_dir("scanclean-markers");
    fs::create_dir_all(&out_dir).unwrap();
    let output = out_dir.join("out.txt");

    let mut page = Vec::new();
    page.extend(line_tokens(&["great", "power", "[12]", "decided"], 1, 1, 100, 40));
    page.extend(line_tokens(&["in", "the", "year", "1942", "they"], 1, 2, 150, 40));

    let rasterizer = FakeRasterizer::with_page_heights(&[1000]);
    let recognizer = FakeRecognizer {
        per_page: vec![page],
        fail_on: None,
    };

    let config = PipelineConfig::new(PathBuf::from("in.pdf"), output.clone());
    process(&rasterizer, &recognizer, &config)?;

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text, "great power decided in the year 1942 they");

    let _ = fs::remove_dir_all(&out_dir);
    Ok(())
}

#[test]
fn failed_page_aborts_the_run_without_output() {
    let out_dir = temp_output_dir("scanclean-abort");
    fs::create_dir_all(&out_dir).unwrap();
    let output = out_dir.join("out.txt");

    let rasterizer = FakeRasterizer::with_page_heights(&[1000, 1000]);
    let recognizer = FakeRecognizer {
        per_page: vec![line_tokens(&["hola"], 1, 1, 100, 40), Vec::new()],
        fail_on: Some(1),
    };

    let config = PipelineConfig::new(PathBuf::from("in.pdf"), output.clone());
    let err = process(&rasterizer, &recognizer, &config).unwrap_err();

    assert!(matches!(err, ScanError::Recognize { page: 2, .. }));
    assert!(!output.exists(), "no partial output may be written");

    let _ = fs::remove_dir_all(&out_dir);
}

proptest! {
    /// Running the normalizer on its own output changes nothing.
    #[test]
    fn normalize_is_idempotent(
        s in "[a-zA-Z0-9áéíóúñÁÉÍ() \\t\\n.,!?…:;\\[\\]-]{0,160}"
    ) {
        let opts = NormalizeOptions::default();
        let once = normalize(&[s], &opts);
        let twice = normalize(&[once.clone()], &opts);
        prop_assert_eq!(twice, once);
    }
}

/// Full pipeline against the real poppler/tesseract binaries. Needs a sample
/// scan at test/sample.pdf and both tools on PATH.
#[test]
#[ignore]
fn real_binaries_pipeline() -> anyhow::Result<()> {
    let sample = PathBuf::from("test/sample.pdf");
    if !sample.exists() {
        eprintln!("Skipping test: test/sample.pdf not found");
        return Ok(());
    }

    let out_dir = temp_output_dir("scanclean-real");
    fs::create_dir_all(&out_dir)?;
    let output = out_dir.join("sample.txt");

    let config = PipelineConfig::new(sample, output.clone());
    scanclean::pipeline::run(&config)?;

    let text = fs::read_to_string(&output)?;
    assert!(!text.trim().is_empty(), "pipeline should produce text");

    let _ = fs::remove_dir_all(&out_dir);
    Ok(())
}
