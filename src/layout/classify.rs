use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::model::Line;

/// A bare 1-4 digit integer is a page number wherever it sits.
static PAGE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d{1,4}\s*$").unwrap());

/// "12. " / "12) " at line start marks a numbered footnote.
static NOTE_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d{1,3}[.)]\s+").unwrap());

#[derive(Debug, Clone, Copy)]
pub struct ClassifyOptions {
    /// Bottom fraction of the page height treated as the footnote band.
    pub bottom_ratio: f32,
    /// A line shorter than this fraction of the median height is suspect.
    pub small_text_factor: f32,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            bottom_ratio: 0.22,
            small_text_factor: 0.70,
        }
    }
}

/// Keep body lines, drop footnotes and page numbers.
///
/// Page-number lines go regardless of position. Everything else is dropped
/// only when it sits at or below the footnote cutoff AND carries a second
/// signal: a leading numeric marker, or a height notably below the page's
/// median. Requiring both keeps short body lines that end up near the bottom.
pub fn classify(lines: Vec<Line>, page_height: u32, opts: &ClassifyOptions) -> Vec<Line> {
    if lines.is_empty() {
        return lines;
    }

    let median = median_height(&lines);
    let cutoff = page_height as f32 * (1.0 - opts.bottom_ratio);

    lines
        .into_iter()
        .filter(|line| {
            if PAGE_NUMBER_RE.is_match(&line.text) {
                return false;
            }
            let in_band = line.rect.y as f32 >= cutoff;
            if !in_band {
                return true;
            }
            let marked = NOTE_MARKER_RE.is_match(&line.text);
            let small =
                median > 0.0 && (line.rect.height as f32) < median * opts.small_text_factor;
            !(marked || small)
        })
        .collect()
}

/// Median of the line heights; mean of the middle pair for even counts,
/// 0.0 only when there are no lines.
fn median_height(lines: &[Line]) -> f32 {
    let mut heights: Vec<u32> = lines.iter().map(|l| l.rect.height).collect();
    if heights.is_empty() {
        return 0.0;
    }
    heights.sort_unstable();
    let mid = heights.len() / 2;
    if heights.len() % 2 == 1 {
        heights[mid] as f32
    } else {
        (heights[mid - 1] + heights[mid]) as f32 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Rect;
    use pretty_assertions::assert_eq;

    const PAGE_HEIGHT: u32 = 1000; // default cutoff at y = 780

    fn line(text: &str, y: u32, height: u32) -> Line {
        Line::new(text, Rect::new(100, y, 400, height))
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn empty_page_stays_empty() {
        let kept = classify(Vec::new(), PAGE_HEIGHT, &ClassifyOptions::default());
        assert!(kept.is_empty());
    }

    #[test]
    fn page_number_goes_wherever_it_sits() {
        let kept = classify(
            vec![line("42", 50, 20), line("texto normal", 100, 20)],
            PAGE_HEIGHT,
            &ClassifyOptions::default(),
        );
        assert_eq!(texts(&kept), vec!["texto normal"]);
    }

    #[test]
    fn numbered_note_in_band_is_dropped() {
        let kept = classify(
            vec![
                line("cuerpo del texto", 100, 20),
                line("2. Véase el capítulo anterior", 900, 20),
            ],
            PAGE_HEIGHT,
            &ClassifyOptions::default(),
        );
        assert_eq!(texts(&kept), vec!["cuerpo del texto"]);
    }

    #[test]
    fn small_line_in_band_is_dropped_but_kept_above_cutoff() {
        // median height 20, so 12 < 20 * 0.70 reads as footnote type
        let body = [
            line("una línea", 100, 20),
            line("otra línea", 140, 20),
            line("tercera línea", 180, 20),
        ];

        let mut with_bottom_note = body.to_vec();
        with_bottom_note.push(line("a minor note", 900, 12));
        let kept = classify(with_bottom_note, PAGE_HEIGHT, &ClassifyOptions::default());
        assert_eq!(kept.len(), 3);

        let mut with_high_note = body.to_vec();
        with_high_note.push(line("a minor note", 400, 12));
        let kept = classify(with_high_note, PAGE_HEIGHT, &ClassifyOptions::default());
        assert_eq!(kept.len(), 4);
    }

    #[test]
    fn short_body_line_in_band_survives_without_second_signal() {
        let kept = classify(
            vec![line("texto", 100, 20), line("Fin.", 900, 20)],
            PAGE_HEIGHT,
            &ClassifyOptions::default(),
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn non_numeric_line_above_cutoff_is_never_dropped() {
        let kept = classify(
            vec![line("x", 0, 1), line("y", 779, 1)],
            PAGE_HEIGHT,
            &ClassifyOptions::default(),
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn five_digit_number_is_not_a_page_number() {
        let kept = classify(
            vec![line("12345", 500, 20)],
            PAGE_HEIGHT,
            &ClassifyOptions::default(),
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn order_is_preserved() {
        let kept = classify(
            vec![line("b", 200, 20), line("a", 100, 20)],
            PAGE_HEIGHT,
            &ClassifyOptions::default(),
        );
        assert_eq!(texts(&kept), vec!["b", "a"]);
    }
}
