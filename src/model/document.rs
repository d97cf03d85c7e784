//! Document-level types.

use super::{ContentBlock, StyledBlock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The reconstructed document: styled pages in source order.
///
/// Terminal output of the layout engine, consumed by a
/// [`DocumentWriter`](crate::render::DocumentWriter).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyledDocument {
    /// Source document metadata
    pub metadata: Metadata,

    /// Pages in source order
    pub pages: Vec<PageLayout>,
}

impl StyledDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Plain text of every page, pages separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(PageLayout::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One page of the styled document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page index (0-based)
    pub index: usize,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Median font size of all words on the page
    pub dominant_font_size: f32,

    /// First font name seen on the page
    pub dominant_font_name: String,

    /// Styled blocks, top to bottom
    pub blocks: Vec<StyledBlock>,

    /// Whether a page break follows this page
    pub page_break_after: bool,
}

impl PageLayout {
    /// Create an empty page.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            dominant_font_size: 11.0,
            dominant_font_name: String::new(),
            blocks: Vec::new(),
            page_break_after: false,
        }
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Content blocks (spacers skipped) in reading order.
    pub fn content_blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.blocks.iter().filter_map(StyledBlock::content)
    }

    /// Plain text of the page.
    pub fn plain_text(&self) -> String {
        self.content_blocks()
            .map(|block| match block {
                ContentBlock::Text(line) => line.text(),
                ContentBlock::Table(table) => table.plain_text(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Document metadata read from the PDF Info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: Option<String>,

    /// Total number of pages in the source
    pub page_count: usize,
}

impl Metadata {
    /// Create metadata with a PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: Some(version.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, BlockStyle, TableBlock};

    #[test]
    fn test_document_new() {
        let doc = StyledDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_page_plain_text_skips_spacers() {
        let mut page = PageLayout::new(0, 612.0, 792.0);
        page.blocks.push(StyledBlock::Content {
            block: ContentBlock::Table(TableBlock::new(
                BBox::new(0.0, 0.0, 10.0, 10.0),
                vec![vec![Some("A".into()), Some("B".into())]],
            )),
            style: BlockStyle::new("Times New Roman", 11.0),
        });
        page.blocks.push(StyledBlock::Spacer { space_after: 4.0 });

        assert_eq!(page.content_blocks().count(), 1);
        assert_eq!(page.plain_text(), "A\tB");
    }

    #[test]
    fn test_metadata_with_version() {
        let metadata = Metadata::with_version("1.7");
        assert_eq!(metadata.pdf_version.as_deref(), Some("1.7"));
        assert!(metadata.title.is_none());
    }
}
