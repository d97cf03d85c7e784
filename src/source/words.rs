//! Splitting text spans into positioned words.

use unicode_normalization::UnicodeNormalization;

use crate::model::PositionedWord;

use super::TextSpan;

/// Share of the font size above the baseline.
const ASCENT: f32 = 0.8;

/// Share of the font size below the baseline.
const DESCENT: f32 = 0.2;

/// Spans closer than this (times font size) continue the previous word.
const JOIN_GAP: f32 = 0.1;

/// Split spans into words on whitespace and convert to top-down coordinates.
///
/// Text is NFKC-normalized so ligature glyphs become plain letters. Word
/// extents are interpolated from the span's extent by character count.
/// A span that starts right where the previous one stopped, with no
/// whitespace on either side, continues the previous word.
pub(crate) fn spans_to_words(spans: &[TextSpan], page_top: f32) -> Vec<PositionedWord> {
    let mut words: Vec<PositionedWord> = Vec::new();
    let mut previous: Option<&TextSpan> = None;
    let mut open_word = false;

    for span in spans {
        let text: String = span.text.nfkc().collect();
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            continue;
        }

        let char_width = (span.x1 - span.x0) / chars.len() as f32;
        let size = span.font_size;
        let top = page_top - (span.baseline + ASCENT * size);
        let bottom = page_top - (span.baseline - DESCENT * size);

        let mut first_piece = true;
        let mut start: Option<usize> = None;

        for i in 0..=chars.len() {
            let boundary = i == chars.len() || chars[i].is_whitespace();
            match (start, boundary) {
                (None, false) => start = Some(i),
                (Some(s), true) => {
                    let piece: String = chars[s..i].iter().collect();
                    let x0 = span.x0 + s as f32 * char_width;
                    let x1 = span.x0 + i as f32 * char_width;

                    let continues = first_piece
                        && s == 0
                        && open_word
                        && previous.is_some_and(|p| continues_word(p, span));

                    match words.last_mut() {
                        Some(last) if continues => {
                            last.text.push_str(&piece);
                            last.x1 = last.x1.max(x1);
                        }
                        _ => {
                            let mut word = PositionedWord::new(piece, x0, x1, top, bottom);
                            word.font_name = span.font_name.clone();
                            word.font_size = Some(size);
                            words.push(word);
                        }
                    }

                    first_piece = false;
                    start = None;
                }
                _ => {}
            }
        }

        open_word = !chars[chars.len() - 1].is_whitespace();
        previous = Some(span);
    }

    words
}

fn continues_word(previous: &TextSpan, next: &TextSpan) -> bool {
    let tolerance = JOIN_GAP * next.font_size.max(previous.font_size);
    (next.baseline - previous.baseline).abs() < 0.5 && (next.x0 - previous.x1).abs() <= tolerance
}
