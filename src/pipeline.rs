use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::model::{Line, Page};
use crate::error::{Result, ScanError};
use crate::layout::{classify, reconstruct, ClassifyOptions};
use crate::ocr::{PopplerRasterizer, Rasterizer, Recognizer, TesseractRecognizer};
use crate::text::{normalize, LexicalFilter, NormalizeOptions, SpanishFixups};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Raster resolution; 300-400 is a good balance for book scans.
    pub dpi: u32,
    /// Tesseract language codes, e.g. "spa" or "spa+eng".
    pub langs: String,
    pub bottom_ratio: f32,
    pub small_text_factor: f32,
    pub strip_inline_markers: bool,
    pub dehyphenate: bool,
    /// Apply the Spanish lexical post-filter after normalization.
    pub lexical_fixups: bool,
    /// Write a JSON trace of reconstructed and kept lines per page.
    pub debug: bool,
}

impl PipelineConfig {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            dpi: 350,
            langs: "spa".to_string(),
            bottom_ratio: 0.22,
            small_text_factor: 0.70,
            strip_inline_markers: true,
            dehyphenate: true,
            lexical_fixups: false,
            debug: false,
        }
    }
}

/// Per-page record emitted by `--debug`: every reconstructed line alongside
/// the ones the classifier kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTrace {
    pub page: Page,
    pub kept: Vec<Line>,
}

/// Run the whole pipeline with the concrete poppler/tesseract collaborators.
/// Page images go to a scratch directory that is removed afterwards; a
/// successful run leaves exactly the output file (plus the opt-in trace).
pub fn run(config: &PipelineConfig) -> Result<()> {
    let work_dir = scratch_dir();
    let rasterizer = PopplerRasterizer::new(work_dir.clone(), config.dpi);
    let recognizer = TesseractRecognizer::new().with_langs(config.langs.clone());
    let result = process(&rasterizer, &recognizer, config);
    let _ = fs::remove_dir_all(&work_dir);
    result
}

/// The pipeline proper, generic over the two external collaborators.
///
/// Pages are processed strictly in order, one at a time; each page's image
/// and token set are dropped once its lines are folded into text. Nothing is
/// written until every page has been rendered and recognized.
pub fn process<R: Rasterizer, E: Recognizer>(
    rasterizer: &R,
    recognizer: &E,
    config: &PipelineConfig,
) -> Result<()> {
    let classify_opts = ClassifyOptions {
        bottom_ratio: config.bottom_ratio,
        small_text_factor: config.small_text_factor,
    };
    let normalize_opts = NormalizeOptions {
        strip_inline_markers: config.strip_inline_markers,
        dehyphenate: config.dehyphenate,
    };

    let rendered = rasterizer.render_pages(&config.input)?;

    let mut page_texts: Vec<String> = Vec::with_capacity(rendered.len());
    let mut traces: Vec<PageTrace> = Vec::new();

    for (idx, page_image) in rendered.iter().enumerate() {
        let tokens = recognizer.recognize(&page_image.path, idx)?;
        let lines = reconstruct(tokens);
        log::debug!(
            "page {}: {} lines reconstructed ({}x{} px)",
            idx + 1,
            lines.len(),
            page_image.width,
            page_image.height
        );

        let all_lines = config.debug.then(|| lines.clone());
        let kept = classify(lines, page_image.height, &classify_opts);
        log::debug!("page {}: {} lines kept", idx + 1, kept.len());

        if let Some(all_lines) = all_lines {
            traces.push(PageTrace {
                page: Page {
                    number: idx + 1,
                    height: page_image.height,
                    lines: all_lines,
                },
                kept: kept.clone(),
            });
        }

        let block = kept
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        page_texts.push(block);
    }

    let mut text = normalize(&page_texts, &normalize_opts);
    if config.lexical_fixups {
        text = SpanishFixups::new().apply(&text);
    }

    fs::write(&config.output, &text).map_err(|source| ScanError::Write {
        path: config.output.clone(),
        source,
    })?;

    if config.debug {
        write_trace(config, &traces)?;
    }

    Ok(())
}

fn write_trace(config: &PipelineConfig, traces: &[PageTrace]) -> Result<()> {
    let path = trace_path(&config.output);
    let json = serde_json::to_string_pretty(traces).map_err(|e| ScanError::Write {
        path: path.clone(),
        source: e.into(),
    })?;
    fs::write(&path, json).map_err(|source| ScanError::Write { path, source })
}

fn trace_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".pages.json");
    output.with_file_name(name)
}

fn scratch_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let pid = std::process::id();
    dir.push(format!("scanclean-{pid}-{now}"));
    dir
}
