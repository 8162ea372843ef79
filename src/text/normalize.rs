use once_cell::sync::Lazy;
use regex::Regex;

/// Inline reference markers: [12], (12) or 12) with 1-3 digits, only after a
/// non-word character (or at the start), so 4-digit runs like years survive.
/// The leading character is captured and reinserted.
static INLINE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\W)(\[\d{1,3}\]|\(\d{1,3}\)|\d{1,3}\))").unwrap());

static TRAILING_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Punctuation that ends a sentence; a line break after one of these is kept.
const TERMINAL: &[char] = &['.', '!', '?', '…', ':', ';'];

#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    pub strip_inline_markers: bool,
    pub dehyphenate: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_inline_markers: true,
            dehyphenate: true,
        }
    }
}

/// Join per-page text blocks into one continuous document.
///
/// The rewrite order matters; each step runs on the previous step's output:
/// page join, inline-marker strip, de-hyphenation, trailing-whitespace trim,
/// blank-run collapse, wrapped-line join, space collapse, final trim.
/// Content is never reordered — only whitespace and short numeric-marker
/// noise are merged or removed — and the whole rewrite is idempotent.
pub fn normalize(page_texts: &[String], opts: &NormalizeOptions) -> String {
    let mut text = page_texts.join("\n");

    if opts.strip_inline_markers {
        text = strip_inline_markers(&text);
    }
    if opts.dehyphenate {
        text = join_hyphen_breaks(&text);
    }

    text = TRAILING_WS_RE.replace_all(&text, "\n").into_owned();
    text = BLANK_RUN_RE.replace_all(&text, "\n\n").into_owned();
    text = join_wrapped_lines(&text);
    text = SPACE_RUN_RE.replace_all(&text, " ").into_owned();
    text.trim().to_string()
}

/// One replace_all pass can leave a residue on adjacent markers ("[1][2]"),
/// so the rewrite iterates until it stops changing anything.
fn strip_inline_markers(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = INLINE_MARKER_RE.replace_all(&current, "${1}").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Remove a hyphen-newline pair wedged between two word characters:
/// "civi-\nlización" becomes "civilización". The continuation character is
/// not consumed, so chained breaks resolve in a single pass.
fn join_hyphen_breaks(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '-'
            && i > 0
            && is_word(chars[i - 1])
            && chars.get(i + 1) == Some(&'\n')
            && chars.get(i + 2).copied().is_some_and(is_word)
        {
            i += 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Replace a lone newline with a space when the previous character is neither
/// a newline nor sentence-terminal punctuation and the next character is not
/// a newline. A preceding newline counts as a barrier, which is what keeps
/// blank-line paragraph breaks intact.
fn join_wrapped_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for i in 0..chars.len() {
        if chars[i] == '\n' {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();
            let mergeable = prev.is_some_and(|p| p != '\n' && !TERMINAL.contains(&p))
                && next.is_some_and(|n| n != '\n');
            if mergeable {
                out.push(' ');
                continue;
            }
        }
        out.push(chars[i]);
    }
    out
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
