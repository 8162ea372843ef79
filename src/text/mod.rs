pub mod fixups;
pub mod normalize;

pub use fixups::{LexicalFilter, SpanishFixups};
pub use normalize::{normalize, NormalizeOptions};
