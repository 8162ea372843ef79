use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Failures that abort a run. None of these are retried: they are
/// environmental, not transient, and a run is all-or-nothing.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The source document could not be opened or rendered to images.
    #[error("render failed for {}: {reason}", .path.display())]
    Render { path: PathBuf, reason: String },

    /// The recognition engine was unavailable or failed on a page.
    /// `page` is 1-based.
    #[error("recognition failed on page {page}: {reason}")]
    Recognize { page: usize, reason: String },

    /// The destination could not be written.
    #[error("write failed for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn render(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ScanError::Render {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn recognize(page_idx: usize, reason: impl Into<String>) -> Self {
        ScanError::Recognize {
            page: page_idx + 1,
            reason: reason.into(),
        }
    }
}
