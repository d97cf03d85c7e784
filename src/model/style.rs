//! Presentation attributes inferred for each block.

use serde::{Deserialize, Serialize};

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (writer default)
    #[default]
    Left,
    /// Center alignment
    Center,
}

/// Style applied to a text line or table when it is written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStyle {
    /// Font size in points
    pub font_size: f32,

    /// Font family name
    pub font_name: String,

    /// Bold text
    pub bold: bool,

    /// Underlined text
    pub underline: bool,

    /// Paragraph alignment
    pub alignment: Alignment,

    /// Space after the block in points (`None` for the last block on a page)
    pub space_after: Option<f32>,
}

impl BlockStyle {
    /// Create a plain left-aligned style.
    pub fn new(font_name: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_size,
            font_name: font_name.into(),
            bold: false,
            underline: false,
            alignment: Alignment::Left,
            space_after: None,
        }
    }

    /// Check if the block is centered.
    pub fn is_centered(&self) -> bool {
        self.alignment == Alignment::Center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_style_defaults() {
        let style = BlockStyle::new("Times New Roman", 11.0);
        assert_eq!(style.alignment, Alignment::Left);
        assert!(!style.bold);
        assert!(!style.is_centered());
        assert!(style.space_after.is_none());
    }

    #[test]
    fn test_alignment_serde() {
        let json = serde_json::to_string(&Alignment::Center).unwrap();
        assert_eq!(json, "\"center\"");
    }
}
