pub mod geometry;
pub mod model;

pub use geometry::Rect;
pub use model::{GroupKey, Line, Page, Token};
