use serde::{Deserialize, Serialize};

use crate::core::geometry::Rect;

/// Reading-order key assigned by the recognition engine: tokens sharing a
/// (block, paragraph, line) triple belong to the same logical line. Ordering
/// is lexicographic in that field order, which is the engine's reading order.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct GroupKey {
    pub block: u32,
    pub par: u32,
    pub line: u32,
}

impl GroupKey {
    pub fn new(block: u32, par: u32, line: u32) -> Self {
        Self { block, par, line }
    }
}

/// A single recognized word/fragment. Confidence below 0.0 is the engine's
/// "no detection" sentinel. Tokens are discarded once folded into a Line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub confidence: f32,
    pub rect: Rect,
    pub group: GroupKey,
}

/// A reconstructed row of text. The text is the space-joined trimmed token
/// texts in extraction order and is never empty or whitespace-padded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub text: String,
    pub rect: Rect,
}

impl Line {
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            text: text.into(),
            rect,
        }
    }
}

/// One rasterized page's reconstructed lines. Built per rendered image,
/// consumed into a filtered text block, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    /// Page image height in pixels; the footnote band is a fraction of it.
    pub height: u32,
    pub lines: Vec<Line>,
}
