use std::collections::BTreeMap;

use crate::core::model::{GroupKey, Line, Token};

/// Engine confidence below this is the "no detection" sentinel (tesseract
/// reports -1 on structural rows).
pub const MIN_CONFIDENCE: f32 = 0.0;

/// Group tokens into logical lines by their reading-order key.
///
/// Tokens below the confidence sentinel or with whitespace-only text are
/// dropped first; groups emptied by that filtering yield no line. Grouping
/// honors the engine's (block, paragraph, line) identity — tokens are never
/// re-segmented by geometry — and output order is ascending key order.
pub fn reconstruct(tokens: Vec<Token>) -> Vec<Line> {
    let mut groups: BTreeMap<GroupKey, Vec<Token>> = BTreeMap::new();
    for token in tokens {
        if token.confidence < MIN_CONFIDENCE {
            continue;
        }
        if token.text.trim().is_empty() {
            continue;
        }
        groups.entry(token.group).or_default().push(token);
    }

    groups
        .into_values()
        .map(|members| {
            let text = members
                .iter()
                .map(|t| t.text.trim())
                .collect::<Vec<_>>()
                .join(" ");
            let rect = members
                .iter()
                .skip(1)
                .fold(members[0].rect, |acc, t| acc.fold(&t.rect));
            Line::new(text, rect)
        })
        .collect()
}
