//! Writer interface for styled documents.
//!
//! A [`DocumentWriter`] is a word-processor-like sink: it receives
//! paragraphs, tables, spacers and page breaks in reading order.
//! [`write_document`] walks a [`StyledDocument`] and drives any writer.
//!
//! # Example
//!
//! ```
//! use relayout::render::{write_document, DocumentWriter, PageSetup, Length};
//! use relayout::model::{BlockStyle, StyledDocument};
//! use relayout::Result;
//!
//! #[derive(Default)]
//! struct LineCounter(usize);
//!
//! impl DocumentWriter for LineCounter {
//!     fn paragraph(&mut self, _text: &str, _style: &BlockStyle) -> Result<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//!     fn table(
//!         &mut self,
//!         _rows: &[Vec<String>],
//!         _widths: Option<&[Length]>,
//!         _style: &BlockStyle,
//!     ) -> Result<()> {
//!         Ok(())
//!     }
//!     fn finish(&mut self) -> Result<Vec<u8>> {
//!         Ok(self.0.to_string().into_bytes())
//!     }
//! }
//!
//! let mut counter = LineCounter::default();
//! let out = write_document(&StyledDocument::new(), &PageSetup::default(), &mut counter).unwrap();
//! assert_eq!(out, b"0");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{BlockStyle, ContentBlock, Metadata, StyledBlock, StyledDocument};

const POINTS_PER_INCH: f32 = 72.0;
const TWIPS_PER_POINT: f32 = 20.0;
const EMU_PER_POINT: f32 = 12700.0;

/// Narrowest column width emitted, in points.
const MIN_COLUMN_WIDTH: f32 = 1.0;

/// A length stored in points.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Length(f32);

impl Length {
    /// Length in points.
    pub fn points(points: f32) -> Self {
        Self(points)
    }

    /// Length in inches.
    pub fn inches(inches: f32) -> Self {
        Self(inches * POINTS_PER_INCH)
    }

    /// Value in points.
    pub fn as_points(&self) -> f32 {
        self.0
    }

    /// Value in inches.
    pub fn as_inches(&self) -> f32 {
        self.0 / POINTS_PER_INCH
    }

    /// Value in twentieths of a point.
    pub fn as_twips(&self) -> i64 {
        (self.0 * TWIPS_PER_POINT).round() as i64
    }

    /// Value in English Metric Units.
    pub fn as_emu(&self) -> i64 {
        (self.0 * EMU_PER_POINT).round() as i64
    }
}

/// Page margins applied by writers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub margin_top: Length,
    pub margin_bottom: Length,
    pub margin_left: Length,
    pub margin_right: Length,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            margin_top: Length::inches(0.5),
            margin_bottom: Length::inches(0.5),
            margin_left: Length::inches(0.75),
            margin_right: Length::inches(0.75),
        }
    }
}

impl PageSetup {
    /// Set all four margins.
    pub fn with_margins(mut self, top: Length, bottom: Length, left: Length, right: Length) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self.margin_left = left;
        self.margin_right = right;
        self
    }
}

/// Column widths from table column boundaries.
///
/// Returns `None` unless there are at least `columns + 1` boundaries. Each
/// width is the distance between neighbouring boundaries, at least one
/// point.
pub fn column_widths(boundaries: &[f32], columns: usize) -> Option<Vec<Length>> {
    if columns == 0 || boundaries.len() < columns + 1 {
        return None;
    }

    Some(
        boundaries
            .windows(2)
            .take(columns)
            .map(|w| Length::points((w[1] - w[0]).max(MIN_COLUMN_WIDTH)))
            .collect(),
    )
}

/// Sink for styled document content.
///
/// Only paragraphs, tables and `finish` are required. The remaining hooks
/// default to doing nothing.
pub trait DocumentWriter {
    /// Called once before any content.
    fn begin_document(&mut self, setup: &PageSetup, metadata: &Metadata) -> Result<()> {
        let _ = (setup, metadata);
        Ok(())
    }

    /// Write one text paragraph.
    fn paragraph(&mut self, text: &str, style: &BlockStyle) -> Result<()>;

    /// Write a table. Rows are padded to equal length.
    fn table(
        &mut self,
        rows: &[Vec<String>],
        widths: Option<&[Length]>,
        style: &BlockStyle,
    ) -> Result<()>;

    /// Write an empty paragraph with the given spacing after it.
    fn spacer(&mut self, space_after: f32) -> Result<()> {
        let _ = space_after;
        Ok(())
    }

    /// Start a new page.
    fn page_break(&mut self) -> Result<()> {
        Ok(())
    }

    /// Put a page-number field in the page footer.
    fn footer_page_number(&mut self) -> Result<()> {
        Ok(())
    }

    /// Produce the finished output.
    fn finish(&mut self) -> Result<Vec<u8>>;
}

/// Drive a writer over a styled document.
pub fn write_document(
    doc: &StyledDocument,
    setup: &PageSetup,
    writer: &mut dyn DocumentWriter,
) -> Result<Vec<u8>> {
    writer.begin_document(setup, &doc.metadata)?;

    for page in &doc.pages {
        for block in &page.blocks {
            match block {
                StyledBlock::Content {
                    block: ContentBlock::Text(line),
                    style,
                } => writer.paragraph(&line.text(), style)?,
                StyledBlock::Content {
                    block: ContentBlock::Table(table),
                    style,
                } => {
                    let rows = table.padded_rows();
                    let widths = table
                        .column_boundaries
                        .as_deref()
                        .and_then(|b| column_widths(b, table.column_count()));
                    writer.table(&rows, widths.as_deref(), style)?;
                }
                StyledBlock::Spacer { space_after } => writer.spacer(*space_after)?,
            }
        }

        if page.page_break_after {
            writer.page_break()?;
        }
    }

    writer.footer_page_number()?;
    writer.finish()
}
