//! Line blocks and the content blocks that make up a page's reading order.

use serde::{Deserialize, Serialize};

use super::{BlockStyle, PositionedWord, TableBlock};

/// Words judged to sit on the same text line, with aggregate metadata.
///
/// Built by [`build_line_block`](crate::layout::build_line_block); the
/// aggregates are computed once from the words and cannot be changed
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBlock {
    words: Vec<PositionedWord>,
    top: f32,
    bottom: f32,
    center_x: f32,
    font_size: Option<f32>,
    font_name: Option<String>,
    is_bold: bool,
}

impl LineBlock {
    pub(crate) fn from_parts(
        words: Vec<PositionedWord>,
        top: f32,
        bottom: f32,
        center_x: f32,
        font_size: Option<f32>,
        font_name: Option<String>,
        is_bold: bool,
    ) -> Self {
        debug_assert!(!words.is_empty());
        Self {
            words,
            top,
            bottom,
            center_x,
            font_size,
            font_name,
            is_bold,
        }
    }

    /// Words in left-to-right order.
    pub fn words(&self) -> &[PositionedWord] {
        &self.words
    }

    /// Smallest word top.
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Largest word bottom.
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Mean of the word midpoints.
    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    /// Median font size of the words that report one.
    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    /// Font name of the leftmost word that reports one.
    pub fn font_name(&self) -> Option<&str> {
        self.font_name.as_deref()
    }

    /// Whether any word uses a bold-looking font.
    pub fn is_bold(&self) -> bool {
        self.is_bold
    }

    /// Word texts joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

/// A unit of a page's reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text line
    Text(LineBlock),
    /// A table
    Table(TableBlock),
}

impl ContentBlock {
    /// Top coordinate used for ordering.
    pub fn top(&self) -> f32 {
        match self {
            ContentBlock::Text(line) => line.top(),
            ContentBlock::Table(table) => table.bbox.top,
        }
    }

    /// Bottom coordinate used for spacing.
    pub fn bottom(&self) -> f32 {
        match self {
            ContentBlock::Text(line) => line.bottom(),
            ContentBlock::Table(table) => table.bbox.bottom,
        }
    }

    /// Check if this block is a text line.
    pub fn is_text(&self) -> bool {
        matches!(self, ContentBlock::Text(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, ContentBlock::Table(_))
    }
}

/// A content block with its inferred style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StyledBlock {
    /// A styled text line or table
    Content {
        /// The block
        block: ContentBlock,
        /// Its presentation
        style: BlockStyle,
    },

    /// Empty paragraph carrying the spacing after a table
    Spacer {
        /// Space after, in points
        space_after: f32,
    },
}

impl StyledBlock {
    /// The content block, if this is not a spacer.
    pub fn content(&self) -> Option<&ContentBlock> {
        match self {
            StyledBlock::Content { block, .. } => Some(block),
            StyledBlock::Spacer { .. } => None,
        }
    }

    /// The style, if this is not a spacer.
    pub fn style(&self) -> Option<&BlockStyle> {
        match self {
            StyledBlock::Content { style, .. } => Some(style),
            StyledBlock::Spacer { .. } => None,
        }
    }

    /// Spacing after this block in points.
    pub fn space_after(&self) -> Option<f32> {
        match self {
            StyledBlock::Content { style, .. } => style.space_after,
            StyledBlock::Spacer { space_after } => Some(*space_after),
        }
    }

    /// Check if this is a spacer.
    pub fn is_spacer(&self) -> bool {
        matches!(self, StyledBlock::Spacer { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn line() -> LineBlock {
        LineBlock::from_parts(
            vec![
                PositionedWord::new("Hello", 10.0, 40.0, 10.0, 22.0),
                PositionedWord::new("World", 45.0, 80.0, 10.0, 22.0),
            ],
            10.0,
            22.0,
            43.75,
            Some(12.0),
            None,
            false,
        )
    }

    #[test]
    fn test_line_text() {
        assert_eq!(line().text(), "Hello World");
    }

    #[test]
    fn test_content_block_bounds() {
        let text = ContentBlock::Text(line());
        assert_eq!(text.top(), 10.0);
        assert_eq!(text.bottom(), 22.0);
        assert!(text.is_text());

        let table = ContentBlock::Table(TableBlock::new(BBox::new(0.0, 50.0, 100.0, 90.0), vec![]));
        assert_eq!(table.top(), 50.0);
        assert_eq!(table.bottom(), 90.0);
        assert!(table.is_table());
    }

    #[test]
    fn test_spacer_accessors() {
        let spacer = StyledBlock::Spacer { space_after: 6.0 };
        assert!(spacer.is_spacer());
        assert!(spacer.content().is_none());
        assert_eq!(spacer.space_after(), Some(6.0));
    }
}
