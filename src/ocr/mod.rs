pub mod renderer;
pub mod tesseract;

use std::path::Path;

use crate::core::model::Token;
use crate::error::Result;

pub use renderer::{PopplerRasterizer, RenderedPage};
pub use tesseract::TesseractRecognizer;

/// Renders every page of a source document to an image, in document order.
pub trait Rasterizer {
    fn render_pages(&self, pdf_path: &Path) -> Result<Vec<RenderedPage>>;
}

/// Extracts positioned text tokens from one rendered page image.
/// `page_idx` is 0-based and only used for error context.
pub trait Recognizer {
    fn recognize(&self, image: &Path, page_idx: usize) -> Result<Vec<Token>>;
}
