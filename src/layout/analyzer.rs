//! Per-line aggregation of word metadata.

use crate::model::{LineBlock, PositionedWord};

/// Substrings that mark a bold-looking font name.
const BOLD_MARKERS: [&str; 3] = ["bold", "black", "heavy"];

/// Build a line block from the words of one text line.
///
/// Words are reordered left to right. The font size is the median of the
/// sizes the words report, so a single superscript or drop cap does not
/// skew the line. Returns `None` for an empty slice.
pub fn build_line_block(mut words: Vec<PositionedWord>) -> Option<LineBlock> {
    if words.is_empty() {
        return None;
    }

    words.sort_by(|a, b| a.x0.total_cmp(&b.x0));

    let top = words.iter().map(|w| w.top).fold(f32::INFINITY, f32::min);
    let bottom = words
        .iter()
        .map(|w| w.bottom)
        .fold(f32::NEG_INFINITY, f32::max)
        .max(top);
    let center_x = words.iter().map(PositionedWord::center_x).sum::<f32>() / words.len() as f32;

    let sizes: Vec<f32> = words
        .iter()
        .filter_map(|w| w.font_size)
        .filter(|s| *s > 0.0)
        .collect();
    let font_size = median(&sizes);

    let mut font_names = words
        .iter()
        .filter_map(|w| w.font_name.as_deref())
        .filter(|name| !name.is_empty());
    let font_name = font_names.clone().next().map(str::to_string);
    let is_bold = font_names.any(is_bold_font);

    Some(LineBlock::from_parts(
        words, top, bottom, center_x, font_size, font_name, is_bold,
    ))
}

/// Median of a set of values; the mean of the two middle values for an
/// even count.
pub fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Check whether a font name looks bold ("Arial-BoldMT", "Lato-Black", ...).
///
/// PDFs rarely carry an explicit weight flag, so this is a name heuristic.
pub fn is_bold_font(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    BOLD_MARKERS.iter().any(|marker| lower.contains(marker))
}
