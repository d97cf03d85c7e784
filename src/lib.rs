//! # relayout
//!
//! Layout reconstruction for PDF documents.
//!
//! This library reads positioned words and ruling lines from PDF pages and
//! rebuilds an editable document model: text lines with inferred font size,
//! boldness, centering and spacing, ruled tables with their cell text, and
//! page breaks. A [`render::DocumentWriter`] turns the model into a file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use relayout::{convert_file, render};
//!
//! fn main() -> relayout::Result<()> {
//!     let doc = convert_file("form.pdf")?;
//!
//!     let text = render::to_text(&doc)?;
//!     println!("{}", text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Page source**: words and ruling edges from content streams (lopdf)
//! - **Word grouping**: words clustered into lines by vertical position
//! - **Table detection**: ruled grids found from edge intersections
//! - **Composition**: lines and tables merged in top-to-bottom order
//! - **Style inference**: size, font, bold, alignment and spacing per block
//! - **Assembly**: pages laid out in parallel with Rayon, order preserved

pub mod convert;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use convert::{ConvertOptions, DocumentConverter, FallbackConverter, LayoutConverter};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf_bytes, PdfHeader};
pub use error::{Error, Result};
pub use layout::{Assembler, LayoutOptions, LineClassifier, TableSettings};
pub use model::{
    Alignment, BBox, BlockStyle, ContentBlock, LineBlock, Metadata, PageLayout, PositionedWord,
    StyledBlock, StyledDocument, TableBlock,
};
pub use render::{DocumentWriter, JsonFormat, PageSetup, TextWriter};
pub use source::{LopdfSource, PageSource, RawPage};

use std::path::Path;

/// Rebuild the layout of a PDF file.
///
/// # Example
///
/// ```no_run
/// use relayout::convert_file;
///
/// let doc = convert_file("form.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<StyledDocument> {
    convert_file_with_options(path, &ConvertOptions::default())
}

/// Rebuild the layout of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use relayout::{convert_file_with_options, ConvertOptions, LayoutOptions, LineClassifier};
///
/// let options = ConvertOptions::new()
///     .with_layout(LayoutOptions::new().with_classifier(LineClassifier::legal_forms()));
/// let doc = convert_file_with_options("form.pdf", &options).unwrap();
/// ```
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ConvertOptions,
) -> Result<StyledDocument> {
    LayoutConverter::new().convert(path.as_ref(), options)
}

/// Rebuild the layout of a PDF held in memory.
pub fn convert_bytes(data: &[u8]) -> Result<StyledDocument> {
    LayoutConverter::new().convert_bytes(data, &ConvertOptions::default())
}

/// Convert a PDF file to plain text.
///
/// # Example
///
/// ```no_run
/// let text = relayout::to_text("form.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn to_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = convert_file(path)?;
    render::to_text(&doc)
}

/// Convert a PDF file to the JSON form of its styled document.
///
/// # Example
///
/// ```no_run
/// use relayout::{to_json, JsonFormat};
///
/// let json = to_json("form.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("form.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = convert_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for converting PDF documents.
///
/// # Example
///
/// ```no_run
/// use relayout::Relayout;
///
/// let text = Relayout::new()
///     .with_legal_forms()
///     .with_center_tolerance(0.1)
///     .sequential()
///     .convert("form.pdf")?
///     .to_text()?;
/// # Ok::<(), relayout::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Relayout {
    options: ConvertOptions,
    setup: PageSetup,
}

impl Relayout {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    fn map_layout(mut self, f: impl FnOnce(LayoutOptions) -> LayoutOptions) -> Self {
        self.options.layout = f(self.options.layout);
        self
    }

    /// Set the vertical tolerance for grouping words into lines.
    pub fn with_line_tolerance(self, tolerance: f32) -> Self {
        self.map_layout(|o| o.with_line_tolerance(tolerance))
    }

    /// Set the centering tolerance as a fraction of page width.
    pub fn with_center_tolerance(self, tolerance: f32) -> Self {
        self.map_layout(|o| o.with_center_tolerance(tolerance))
    }

    /// Apply the legal-form line classifier.
    pub fn with_legal_forms(self) -> Self {
        self.map_layout(|o| o.with_classifier(LineClassifier::legal_forms()))
    }

    /// Drop text lines that lie inside detected tables.
    pub fn with_suppress_table_text(self, suppress: bool) -> Self {
        self.map_layout(|o| o.with_suppress_table_text(suppress))
    }

    /// Disable parallel page layout.
    pub fn sequential(self) -> Self {
        self.map_layout(LayoutOptions::sequential)
    }

    /// Restrict conversion to pages `start..end` (0-based, end exclusive).
    pub fn with_pages(mut self, start: usize, end: Option<usize>) -> Self {
        self.options = self.options.with_pages(start, end);
        self
    }

    /// Set page margins used by writers.
    pub fn with_page_setup(mut self, setup: PageSetup) -> Self {
        self.setup = setup;
        self
    }

    /// Convert a PDF file.
    pub fn convert<P: AsRef<Path>>(self, path: P) -> Result<RelayoutResult> {
        let document = LayoutConverter::new().convert(path.as_ref(), &self.options)?;
        Ok(RelayoutResult {
            document,
            setup: self.setup,
        })
    }

    /// Convert a PDF from bytes.
    pub fn convert_bytes(self, data: &[u8]) -> Result<RelayoutResult> {
        let document = LayoutConverter::new().convert_bytes(data, &self.options)?;
        Ok(RelayoutResult {
            document,
            setup: self.setup,
        })
    }
}

/// A converted document with output helpers.
#[derive(Debug, Clone)]
pub struct RelayoutResult {
    /// The styled document
    pub document: StyledDocument,
    setup: PageSetup,
}

impl RelayoutResult {
    /// Render as plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document)
    }

    /// Render as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Drive a custom writer with the configured page setup.
    pub fn write_with(&self, writer: &mut dyn DocumentWriter) -> Result<Vec<u8>> {
        render::write_document(&self.document, &self.setup, writer)
    }

    /// Get the styled document.
    pub fn document(&self) -> &StyledDocument {
        &self.document
    }

    /// Consume and return the styled document.
    pub fn into_document(self) -> StyledDocument {
        self.document
    }

    /// Get page count.
    pub fn page_count(&self) -> usize {
        self.document.page_count()
    }

    /// Get document metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.document.metadata
    }

    /// Get plain text without styling.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_options() {
        let builder = Relayout::new()
            .with_line_tolerance(3.0)
            .with_center_tolerance(0.1)
            .with_legal_forms()
            .with_suppress_table_text(true)
            .sequential()
            .with_pages(1, Some(2));

        let layout = &builder.options.layout;
        assert_eq!(layout.line_tolerance, 3.0);
        assert_eq!(layout.center_tolerance, 0.1);
        assert!(layout.classifier.is_some());
        assert!(layout.suppress_table_text);
        assert!(!layout.parallel);
        assert_eq!(builder.options.start_page, 1);
        assert_eq!(builder.options.end_page, Some(2));
    }

    #[test]
    fn test_convert_bytes_rejects_garbage() {
        assert!(matches!(
            convert_bytes(b"not a pdf"),
            Err(Error::UnknownFormat)
        ));
    }
}
