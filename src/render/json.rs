//! JSON rendering for styled documents.

use crate::error::{Error, Result};
use crate::model::StyledDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a styled document to JSON.
pub fn to_json(doc: &StyledDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Parse a styled document back from JSON.
pub fn from_json(json: &str) -> Result<StyledDocument> {
    serde_json::from_str(json).map_err(|e| Error::Render(format!("JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_line_block;
    use crate::model::{
        Alignment, BBox, BlockStyle, ContentBlock, PageLayout, PositionedWord, StyledBlock,
        TableBlock,
    };

    fn sample() -> StyledDocument {
        let mut doc = StyledDocument::new();
        doc.metadata.title = Some("Test".to_string());
        let mut page = PageLayout::new(0, 612.0, 792.0);
        page.blocks.push(StyledBlock::Spacer { space_after: 6.0 });
        doc.pages.push(page);
        doc
    }

    fn text_and_table() -> StyledDocument {
        let line = build_line_block(vec![
            PositionedWord::new("Hello", 72.0, 100.5, 40.0, 52.0).with_font("Helvetica-Bold", 12.0),
            PositionedWord::new("world", 104.0, 130.0, 40.0, 52.0).with_font("Helvetica", 12.0),
        ])
        .unwrap();
        let mut heading = BlockStyle::new("Helvetica-Bold", 12.0);
        heading.alignment = Alignment::Center;
        heading.bold = true;

        let table = TableBlock::new(
            BBox::new(72.0, 100.0, 272.0, 160.0),
            vec![
                vec![Some("Name".to_string()), None],
                vec![Some("two\nlines".to_string()), Some("B".to_string())],
            ],
        )
        .with_column_boundaries(vec![72.0, 172.0, 272.0]);

        let mut page = PageLayout::new(0, 612.0, 792.0);
        page.blocks = vec![
            StyledBlock::Content {
                block: ContentBlock::Text(line),
                style: heading,
            },
            StyledBlock::Content {
                block: ContentBlock::Table(table),
                style: BlockStyle::new("Arial", 11.0),
            },
            StyledBlock::Spacer { space_after: 12.0 },
        ];

        let mut doc = StyledDocument::new();
        doc.pages.push(page);
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Test"));
        assert!(json.contains("\"kind\": \"spacer\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_json_round_trip() {
        let doc = sample();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert_eq!(from_json(&json).unwrap(), doc);
    }

    #[test]
    fn test_json_round_trip_text_and_table() {
        let doc = text_and_table();
        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed, doc);

        let blocks: Vec<&ContentBlock> = parsed.pages[0].content_blocks().collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_text());
        assert!(blocks[1].is_table());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(from_json("{\"pages\": 3}"), Err(Error::Render(_))));
    }
}
