pub mod classify;
pub mod lines;

pub use classify::{classify, ClassifyOptions};
pub use lines::reconstruct;
