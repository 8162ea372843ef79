use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::ImageReader;

use crate::error::{Result, ScanError};
use crate::ocr::Rasterizer;

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Rasterizes via poppler's pdftoppm. Page images land in `work_dir` as
/// `page-<n>.png`; pdftoppm zero-pads the page number to a fixed width, so
/// filename order is page order.
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    work_dir: PathBuf,
    dpi: u32,
}

impl PopplerRasterizer {
    pub fn new(work_dir: PathBuf, dpi: u32) -> Self {
        Self { work_dir, dpi }
    }
}

impl Rasterizer for PopplerRasterizer {
    fn render_pages(&self, pdf_path: &Path) -> Result<Vec<RenderedPage>> {
        fs::create_dir_all(&self.work_dir)
            .map_err(|e| ScanError::render(pdf_path, format!("cannot create work dir: {e}")))?;

        let prefix = self.work_dir.join("page");
        let prefix_str = prefix
            .to_str()
            .ok_or_else(|| ScanError::render(pdf_path, "non-UTF8 work dir not supported"))?;

        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf_path)
            .arg(prefix_str)
            .output()
            .map_err(|e| {
                ScanError::render(
                    pdf_path,
                    format!("failed to invoke pdftoppm; is poppler-utils installed? {e}"),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::render(
                pdf_path,
                format!("pdftoppm exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let mut image_paths = Vec::new();
        let entries = fs::read_dir(&self.work_dir)
            .map_err(|e| ScanError::render(pdf_path, format!("cannot list work dir: {e}")))?;
        for entry in entries {
            let entry =
                entry.map_err(|e| ScanError::render(pdf_path, format!("cannot list work dir: {e}")))?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("page-") && name.ends_with(".png") {
                image_paths.push(path);
            }
        }
        image_paths.sort();

        if image_paths.is_empty() {
            return Err(ScanError::render(pdf_path, "pdftoppm produced no page images"));
        }

        let mut pages = Vec::with_capacity(image_paths.len());
        for path in image_paths {
            let reader = ImageReader::open(&path).map_err(|e| {
                ScanError::render(pdf_path, format!("cannot read {}: {e}", path.display()))
            })?;
            let (width, height) = reader.into_dimensions().map_err(|e| {
                ScanError::render(pdf_path, format!("cannot read {}: {e}", path.display()))
            })?;
            pages.push(RenderedPage {
                path,
                width,
                height,
            });
        }
        Ok(pages)
    }
}

/// Page count via pdfinfo, for the `info` command.
pub fn page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo").arg(pdf_path).output().map_err(|e| {
        ScanError::render(
            pdf_path,
            format!("failed to invoke pdfinfo; is poppler-utils installed? {e}"),
        )
    })?;

    if !output.status.success() {
        return Err(ScanError::render(
            pdf_path,
            format!("pdfinfo exited with {}", output.status),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_page_count(&stdout)
        .ok_or_else(|| ScanError::render(pdf_path, "pdfinfo output did not contain a 'Pages:' line"))
}

fn parse_page_count(stdout: &str) -> Option<usize> {
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            return rest.trim().parse().ok();
        }
    }
    None
}
