//! Clustering of positioned words into text lines.

use crate::model::{LineBlock, PositionedWord};

use super::analyzer::build_line_block;

/// Group words into lines by their (rounded) top coordinate.
///
/// Tops are rounded half to even. Words are sorted by rounded top, then
/// left edge. A single greedy pass
/// keeps appending words while their rounded top stays within `tolerance`
/// points of the top of the word that opened the current line.
///
/// This assumes single-column text: lines from side-by-side columns that
/// share a baseline end up merged.
pub fn group_words_by_line(mut words: Vec<PositionedWord>, tolerance: f32) -> Vec<LineBlock> {
    let mut lines = Vec::new();
    if words.is_empty() {
        return lines;
    }

    words.sort_by(|a, b| {
        a.top
            .round_ties_even()
            .total_cmp(&b.top.round_ties_even())
            .then(a.x0.total_cmp(&b.x0))
    });

    let mut anchor = words[0].top.round_ties_even();
    let mut current: Vec<PositionedWord> = Vec::new();

    for word in words {
        let top = word.top.round_ties_even();
        if (top - anchor).abs() > tolerance {
            lines.extend(build_line_block(std::mem::take(&mut current)));
            anchor = top;
        }
        current.push(word);
    }
    lines.extend(build_line_block(current));

    log::debug!("grouped words into {} lines", lines.len());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f32, top: f32) -> PositionedWord {
        PositionedWord::new(text, x0, x0 + 20.0, top, top + 10.0)
    }

    fn texts(lines: &[LineBlock]) -> Vec<String> {
        lines.iter().map(LineBlock::text).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(group_words_by_line(Vec::new(), 2.0).is_empty());
    }

    #[test]
    fn test_single_word() {
        let lines = group_words_by_line(vec![word("only", 5.0, 5.0)], 2.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].words().len(), 1);
    }

    #[test]
    fn test_same_line_ordered_by_x() {
        let words = vec![
            word("c", 90.0, 100.4),
            word("a", 10.0, 101.0),
            word("b", 50.0, 99.6),
        ];
        let lines = group_words_by_line(words, 2.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(texts(&lines), vec!["a b c"]);
    }

    #[test]
    fn test_lines_split_beyond_tolerance() {
        let words = vec![
            word("second", 10.0, 30.0),
            word("first", 10.0, 10.0),
            word("also-first", 40.0, 12.0),
        ];
        let lines = group_words_by_line(words, 2.0);
        assert_eq!(texts(&lines), vec!["first also-first", "second"]);
    }

    #[test]
    fn test_anchor_does_not_drift() {
        // Each word is within tolerance of its neighbour but the third is
        // 4pt below the anchor, so it opens a new line.
        let words = vec![word("a", 0.0, 10.0), word("b", 30.0, 12.0), word("c", 60.0, 14.0)];
        let lines = group_words_by_line(words, 2.0);
        assert_eq!(texts(&lines), vec!["a b", "c"]);
    }

    #[test]
    fn test_half_point_top_rounds_to_even() {
        // 10.5 rounds down to 10, leaving 13 three points away.
        let words = vec![word("a", 0.0, 10.5), word("b", 30.0, 13.0)];
        let lines = group_words_by_line(words, 2.0);
        assert_eq!(texts(&lines), vec!["a", "b"]);

        // 11.5 rounds up to 12, within tolerance of 13.
        let words = vec![word("a", 0.0, 11.5), word("b", 30.0, 13.0)];
        assert_eq!(group_words_by_line(words, 1.0).len(), 1);
    }

    #[test]
    fn test_tolerance_is_configurable() {
        let words = vec![word("a", 0.0, 10.0), word("b", 30.0, 14.0)];
        assert_eq!(group_words_by_line(words.clone(), 2.0).len(), 2);
        assert_eq!(group_words_by_line(words, 5.0).len(), 1);
    }
}
