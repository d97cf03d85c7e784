//! Converters turning PDF input into styled documents.
//!
//! A [`DocumentConverter`] hides how a document is produced. The crate's own
//! [`LayoutConverter`] runs the layout engine on a lopdf page source; a
//! [`FallbackConverter`] chains a preferred converter with a fallback one.
//!
//! # Example
//!
//! ```no_run
//! use relayout::convert::{ConvertOptions, DocumentConverter, LayoutConverter};
//! use std::path::Path;
//!
//! fn main() -> relayout::Result<()> {
//!     let converter = LayoutConverter::new();
//!     let doc = converter.convert(Path::new("form.pdf"), &ConvertOptions::default())?;
//!     println!("{} pages", doc.page_count());
//!     Ok(())
//! }
//! ```

mod layout;

pub use layout::LayoutConverter;

use crate::error::Result;
use crate::layout::LayoutOptions;
use crate::model::StyledDocument;
use std::path::Path;
use std::sync::Arc;

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Layout engine options
    pub layout: LayoutOptions,

    /// First page to convert (0-based)
    pub start_page: usize,

    /// Page after the last one to convert; `None` means through the end
    pub end_page: Option<usize>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Restrict conversion to pages `start..end` (0-based, end exclusive).
    pub fn with_pages(mut self, start: usize, end: Option<usize>) -> Self {
        self.start_page = start;
        self.end_page = end;
        self
    }
}

/// Trait for document converters.
///
/// Implement this trait to plug another conversion path in front of, or
/// behind, the layout engine.
pub trait DocumentConverter: Send + Sync {
    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert a PDF held in memory.
    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<StyledDocument>;

    /// Convert a PDF file at the given path.
    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<StyledDocument> {
        let bytes = std::fs::read(path)?;
        self.convert_bytes(&bytes, options)
    }
}

/// Tries a primary converter and falls back to a second one on error.
///
/// If both fail, the fallback's error is returned.
#[derive(Clone)]
pub struct FallbackConverter {
    primary: Arc<dyn DocumentConverter>,
    fallback: Arc<dyn DocumentConverter>,
    name: String,
}

impl FallbackConverter {
    /// Chain `primary` with `fallback`.
    pub fn new(primary: Arc<dyn DocumentConverter>, fallback: Arc<dyn DocumentConverter>) -> Self {
        let name = format!("{}+{}", primary.name(), fallback.name());
        Self {
            primary,
            fallback,
            name,
        }
    }

    fn run<F>(&self, attempt: F) -> Result<StyledDocument>
    where
        F: Fn(&dyn DocumentConverter) -> Result<StyledDocument>,
    {
        match attempt(self.primary.as_ref()) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                log::warn!(
                    "{} converter failed ({}), falling back to {}",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                attempt(self.fallback.as_ref())
            }
        }
    }
}

impl std::fmt::Debug for FallbackConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackConverter")
            .field("name", &self.name)
            .finish()
    }
}

impl DocumentConverter for FallbackConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<StyledDocument> {
        self.run(|c| c.convert_bytes(bytes, options))
    }

    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<StyledDocument> {
        self.run(|c| c.convert(path, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::PageLayout;

    struct Failing(&'static str);

    impl DocumentConverter for Failing {
        fn name(&self) -> &str {
            self.0
        }

        fn convert_bytes(&self, _bytes: &[u8], _options: &ConvertOptions) -> Result<StyledDocument> {
            Err(Error::Other(format!("{} unavailable", self.0)))
        }
    }

    struct OnePage;

    impl DocumentConverter for OnePage {
        fn name(&self) -> &str {
            "one-page"
        }

        fn convert_bytes(&self, _bytes: &[u8], _options: &ConvertOptions) -> Result<StyledDocument> {
            let mut doc = StyledDocument::new();
            doc.pages.push(PageLayout::new(0, 612.0, 792.0));
            Ok(doc)
        }
    }

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_layout(LayoutOptions::default().sequential())
            .with_pages(2, Some(5));

        assert!(!options.layout.parallel);
        assert_eq!(options.start_page, 2);
        assert_eq!(options.end_page, Some(5));
    }

    #[test]
    fn test_fallback_used_when_primary_fails() {
        let converter = FallbackConverter::new(Arc::new(Failing("hifi")), Arc::new(OnePage));
        assert_eq!(converter.name(), "hifi+one-page");

        let doc = converter
            .convert_bytes(b"", &ConvertOptions::default())
            .unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_primary_result_kept() {
        let converter = FallbackConverter::new(Arc::new(OnePage), Arc::new(Failing("layout")));
        assert!(converter
            .convert_bytes(b"", &ConvertOptions::default())
            .is_ok());
    }

    #[test]
    fn test_fallback_error_returned_when_both_fail() {
        let converter =
            FallbackConverter::new(Arc::new(Failing("hifi")), Arc::new(Failing("layout")));
        let err = converter
            .convert_bytes(b"", &ConvertOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "layout unavailable");
    }
}
