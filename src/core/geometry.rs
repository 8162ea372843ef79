use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page-pixel coordinates, as reported by the
/// recognition engine (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Fold another rectangle into this one: origin is the componentwise
    /// minimum, extent the componentwise maximum. Line geometry is the fold
    /// of its token rectangles, not a bounding-box union.
    pub fn fold(&self, other: &Self) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}
