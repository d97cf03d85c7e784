//! Positioned words as delivered by a page source.

use serde::{Deserialize, Serialize};

/// A word with its bounding box on the page.
///
/// Coordinates are in points with the origin at the top-left corner of the
/// page, so `top < bottom` for any visible glyph run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedWord {
    /// The word text
    pub text: String,
    /// Left edge
    pub x0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub top: f32,
    /// Bottom edge
    pub bottom: f32,
    /// Font name as reported by the PDF (e.g., "ABCDEF+Helvetica-Bold")
    pub font_name: Option<String>,
    /// Font size in points
    pub font_size: Option<f32>,
}

impl PositionedWord {
    /// Create a word without font metadata.
    pub fn new(text: impl Into<String>, x0: f32, x1: f32, top: f32, bottom: f32) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            top,
            bottom,
            font_name: None,
            font_size: None,
        }
    }

    /// Set the font name and size.
    pub fn with_font(mut self, name: impl Into<String>, size: f32) -> Self {
        self.font_name = Some(name.into());
        self.font_size = Some(size);
        self
    }

    /// Set only the font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Vertical midpoint.
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Width in points.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }
}
