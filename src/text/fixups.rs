use unicode_normalization::UnicodeNormalization;

/// Post-processing pass applied to the normalized document as a whole.
/// Filters are string-in/string-out and know nothing about lines or pages.
pub trait LexicalFilter {
    fn apply(&self, text: &str) -> String;
}

/// Common OCR garbles in Spanish printed text: accents recognized as
/// separate combining marks, grave accents (which Spanish never uses) in
/// place of acute ones, and unexpanded ligature glyphs.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("à", "á"),
    ("è", "é"),
    ("ì", "í"),
    ("ò", "ó"),
    ("ù", "ú"),
    ("À", "Á"),
    ("È", "É"),
    ("Ì", "Í"),
    ("Ò", "Ó"),
    ("Ù", "Ú"),
    ("ﬁ", "fi"),
    ("ﬂ", "fl"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SpanishFixups;

impl SpanishFixups {
    pub fn new() -> Self {
        Self
    }
}

impl LexicalFilter for SpanishFixups {
    fn apply(&self, text: &str) -> String {
        // Recompose combining accents first so the table sees single chars
        let composed: String = text.nfc().collect();
        REPLACEMENTS
            .iter()
            .fold(composed, |acc, (from, to)| acc.replace(from, to))
    }
}
