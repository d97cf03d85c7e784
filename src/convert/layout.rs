//! Converter running the layout engine on a lopdf page source.

use crate::error::{Error, Result};
use crate::layout::{Assembler, TableFinder};
use crate::model::StyledDocument;
use crate::source::{LopdfSource, PageSource, RulingTableFinder};
use std::path::Path;
use std::sync::Arc;

use super::{ConvertOptions, DocumentConverter};

/// Layout-reconstruction converter.
///
/// Extracts words and ruling lines with [`LopdfSource`], finds tables with
/// the configured [`TableFinder`] and assembles a styled document.
#[derive(Clone)]
pub struct LayoutConverter {
    finder: Arc<dyn TableFinder>,
}

impl LayoutConverter {
    /// Create a converter using ruling-line table detection.
    pub fn new() -> Self {
        Self {
            finder: Arc::new(RulingTableFinder::new()),
        }
    }

    /// Use a custom table finder.
    pub fn with_finder(finder: Arc<dyn TableFinder>) -> Self {
        Self { finder }
    }

    fn convert_source(
        &self,
        source: &dyn PageSource,
        options: &ConvertOptions,
    ) -> Result<StyledDocument> {
        let count = source.page_count();
        if options.start_page > 0 && options.start_page >= count {
            return Err(Error::PageOutOfRange(options.start_page, count));
        }

        let end = options.end_page.unwrap_or(count);
        let assembler = Assembler::with_finder(options.layout.clone(), Arc::clone(&self.finder));
        let doc = assembler.assemble_range(source, options.start_page, end)?;

        log::debug!(
            "converted pages {}..{} of {}",
            options.start_page,
            end.min(count),
            count
        );
        Ok(doc)
    }
}

impl Default for LayoutConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LayoutConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutConverter").finish_non_exhaustive()
    }
}

impl DocumentConverter for LayoutConverter {
    fn name(&self) -> &str {
        "layout"
    }

    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<StyledDocument> {
        let source = LopdfSource::from_bytes(bytes)?;
        self.convert_source(&source, options)
    }

    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<StyledDocument> {
        let source = LopdfSource::open(path)?;
        self.convert_source(&source, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PositionedWord;
    use crate::source::{MemorySource, RawPage};

    fn source(pages: usize) -> MemorySource {
        MemorySource::new(
            (0..pages)
                .map(|i| {
                    RawPage::new(i, 612.0, 792.0).with_words(vec![PositionedWord::new(
                        format!("page{}", i),
                        72.0,
                        110.0,
                        72.0,
                        84.0,
                    )])
                })
                .collect(),
        )
    }

    #[test]
    fn test_converter_name() {
        assert_eq!(LayoutConverter::new().name(), "layout");
    }

    #[test]
    fn test_rejects_non_pdf() {
        let err = LayoutConverter::new()
            .convert_bytes(b"hello", &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
        assert!(err.is_extraction_failure());
    }

    #[test]
    fn test_page_range() {
        let converter = LayoutConverter::new();
        let options = ConvertOptions::new().with_pages(1, Some(3));
        let doc = converter.convert_source(&source(5), &options).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].plain_text(), "page1");
        assert_eq!(doc.pages[1].plain_text(), "page2");
    }

    #[test]
    fn test_start_past_end() {
        let options = ConvertOptions::new().with_pages(7, None);
        let err = LayoutConverter::new()
            .convert_source(&source(2), &options)
            .unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange(7, 2)));
    }
}
