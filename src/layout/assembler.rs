//! Page-by-page assembly of a styled document.

use std::sync::Arc;

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{PageLayout, PositionedWord, StyledDocument};
use crate::source::{PageSource, RawPage, RulingTableFinder};

use super::analyzer::median;
use super::compositor::{compose_page, drop_lines_inside_tables};
use super::grouper::group_words_by_line;
use super::options::LayoutOptions;
use super::style::{PageContext, StyleInference};
use super::tables::{TableDetector, TableFinder};

/// Page-wide font context: median word size and first font name.
pub fn page_context(words: &[PositionedWord], width: f32) -> PageContext {
    let sizes: Vec<f32> = words
        .iter()
        .filter_map(|w| w.font_size)
        .filter(|s| *s > 0.0)
        .collect();
    let name = words
        .iter()
        .filter_map(|w| w.font_name.as_deref())
        .find(|n| !n.is_empty())
        .map(str::to_string);

    PageContext::new(width).with_dominant_font(name, median(&sizes))
}

/// Runs the layout pipeline over every page of a document.
#[derive(Debug, Clone)]
pub struct Assembler {
    options: LayoutOptions,
    detector: TableDetector,
}

impl Assembler {
    /// Create an assembler using ruling-line table detection.
    pub fn new(options: LayoutOptions) -> Self {
        Self::with_finder(options, Arc::new(RulingTableFinder::new()))
    }

    /// Create an assembler with a custom table finder.
    pub fn with_finder(options: LayoutOptions, finder: Arc<dyn TableFinder>) -> Self {
        let detector = TableDetector::new(finder, options.table_settings.clone());
        Self { options, detector }
    }

    /// Layout options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out one page.
    pub fn layout_page(&self, page: &RawPage) -> PageLayout {
        let context = page_context(&page.words, page.width);

        let lines = group_words_by_line(page.words.clone(), self.options.line_tolerance);
        let tables = self.detector.detect(page);
        let lines = if self.options.suppress_table_text {
            drop_lines_inside_tables(lines, &tables)
        } else {
            lines
        };

        let blocks = compose_page(lines, tables);
        let styled = StyleInference::new(&self.options).style_page(blocks, &context);

        log::debug!(
            "page {}: {} words -> {} styled blocks",
            page.index,
            page.words.len(),
            styled.len()
        );

        let mut layout = PageLayout::new(page.index, page.width, page.height);
        layout.dominant_font_size = context
            .dominant_font_size
            .unwrap_or(self.options.fallback_font_size);
        layout.dominant_font_name = context
            .dominant_font_name
            .unwrap_or_else(|| self.options.fallback_font_name.clone());
        layout.blocks = styled;
        layout
    }

    /// Lay out pages already in memory. Output keeps input order.
    pub fn assemble(&self, pages: &[RawPage]) -> StyledDocument {
        let mut layouts: Vec<PageLayout> = if self.options.parallel && pages.len() > 1 {
            pages.par_iter().map(|p| self.layout_page(p)).collect()
        } else {
            pages.iter().map(|p| self.layout_page(p)).collect()
        };

        let last = layouts.len().saturating_sub(1);
        for (i, layout) in layouts.iter_mut().enumerate() {
            layout.page_break_after = i < last;
        }

        let mut doc = StyledDocument::new();
        doc.metadata.page_count = layouts.len();
        doc.pages = layouts;
        doc
    }

    /// Read every page from a source and lay them out.
    ///
    /// Any extraction error aborts the whole document.
    pub fn assemble_source(&self, source: &dyn PageSource) -> Result<StyledDocument> {
        self.assemble_range(source, 0, source.page_count())
    }

    /// Read pages `start..end` from a source and lay them out.
    pub fn assemble_range(
        &self,
        source: &dyn PageSource,
        start: usize,
        end: usize,
    ) -> Result<StyledDocument> {
        let end = end.min(source.page_count());
        let pages = (start..end)
            .map(|i| source.page(i))
            .collect::<Result<Vec<_>>>()?;

        let mut doc = self.assemble(&pages);
        doc.metadata = source.metadata();
        Ok(doc)
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn word(text: &str, x0: f32, top: f32) -> PositionedWord {
        PositionedWord::new(text, x0, x0 + 40.0, top, top + 12.0).with_font("Helvetica", 12.0)
    }

    fn page(index: usize, words: Vec<PositionedWord>) -> RawPage {
        RawPage::new(index, 612.0, 792.0).with_words(words)
    }

    #[test]
    fn test_page_context() {
        let words = vec![
            PositionedWord::new("a", 0.0, 1.0, 0.0, 1.0),
            word("b", 0.0, 0.0),
            PositionedWord::new("c", 0.0, 1.0, 0.0, 1.0).with_font("Courier", 8.0),
        ];
        let context = page_context(&words, 500.0);
        assert_eq!(context.width, 500.0);
        assert_eq!(context.dominant_font_size, Some(10.0));
        assert_eq!(context.dominant_font_name.as_deref(), Some("Helvetica"));
    }

    #[test]
    fn test_empty_page() {
        let layout = Assembler::default().layout_page(&page(0, Vec::new()));
        assert!(layout.is_empty());
        assert_eq!(layout.dominant_font_size, 11.0);
        assert_eq!(layout.dominant_font_name, "Times New Roman");
    }

    #[test]
    fn test_page_breaks() {
        let pages: Vec<RawPage> = (0..3).map(|i| page(i, vec![word("x", 10.0, 10.0)])).collect();
        let doc = Assembler::default().assemble(&pages);

        let breaks: Vec<bool> = doc.pages.iter().map(|p| p.page_break_after).collect();
        assert_eq!(breaks, vec![true, true, false]);
        assert_eq!(doc.metadata.page_count, 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages: Vec<RawPage> = (0..6)
            .map(|i| {
                page(
                    i,
                    vec![
                        word("first", 72.0, 100.0),
                        word("line", 120.0, 100.5),
                        word("second", 72.0, 130.0),
                    ],
                )
            })
            .collect();

        let parallel = Assembler::new(LayoutOptions::default()).assemble(&pages);
        let sequential = Assembler::new(LayoutOptions::default().sequential()).assemble(&pages);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.pages[4].index, 4);
    }

    #[test]
    fn test_assemble_range_and_metadata() {
        let source = MemorySource::new((0..4).map(|i| page(i, Vec::new())).collect());
        let doc = Assembler::default().assemble_range(&source, 1, 10).unwrap();
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.pages[0].index, 1);
        assert_eq!(doc.metadata.page_count, 4);
        assert!(!doc.pages[2].page_break_after);
    }
}
