//! Page sources: where positioned words and ruling lines come from.
//!
//! The layout engine never touches PDF objects directly. It consumes
//! [`RawPage`]s from a [`PageSource`]. [`LopdfSource`] reads them from a PDF
//! file, [`MemorySource`] serves pages built in memory.

mod content;
mod lopdf_source;
mod ruling;
mod words;

pub use lopdf_source::LopdfSource;
pub use ruling::RulingTableFinder;
pub(crate) use words::spans_to_words;

pub(crate) use content::TextSpan;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Metadata, PositionedWord};

/// Direction of a ruling line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Drawing operation a ruling line came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSource {
    /// Stroked `m`/`l` path segment
    #[default]
    Line,
    /// Side of an `re` rectangle
    Rect,
}

/// Axis-aligned ruling segment in top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
    pub orientation: Orientation,
    #[serde(default)]
    pub source: EdgeSource,
}

impl Edge {
    /// Horizontal edge from `x0` to `x1` at `y`.
    pub fn horizontal(x0: f32, x1: f32, y: f32) -> Self {
        Self {
            x0: x0.min(x1),
            top: y,
            x1: x0.max(x1),
            bottom: y,
            orientation: Orientation::Horizontal,
            source: EdgeSource::Line,
        }
    }

    /// Vertical edge from `top` to `bottom` at `x`.
    pub fn vertical(x: f32, top: f32, bottom: f32) -> Self {
        Self {
            x0: x,
            top: top.min(bottom),
            x1: x,
            bottom: top.max(bottom),
            orientation: Orientation::Vertical,
            source: EdgeSource::Line,
        }
    }

    /// Mark the edge as a rectangle side.
    pub fn from_rect(mut self) -> Self {
        self.source = EdgeSource::Rect;
        self
    }

    /// Length along the edge's orientation.
    pub fn length(&self) -> f32 {
        match self.orientation {
            Orientation::Horizontal => self.x1 - self.x0,
            Orientation::Vertical => self.bottom - self.top,
        }
    }

    /// Four edges outlining a rectangle.
    pub fn rect(x0: f32, top: f32, x1: f32, bottom: f32) -> [Edge; 4] {
        [
            Edge::horizontal(x0, x1, top).from_rect(),
            Edge::horizontal(x0, x1, bottom).from_rect(),
            Edge::vertical(x0, top, bottom).from_rect(),
            Edge::vertical(x1, top, bottom).from_rect(),
        ]
    }
}

/// Everything the layout engine needs from one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// Zero-based page index
    pub index: usize,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Words in top-down coordinates
    pub words: Vec<PositionedWord>,
    /// Ruling lines in top-down coordinates
    pub edges: Vec<Edge>,
}

impl RawPage {
    /// Create an empty page.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            words: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Set the page's words.
    pub fn with_words(mut self, words: Vec<PositionedWord>) -> Self {
        self.words = words;
        self
    }

    /// Set the page's ruling lines.
    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges;
        self
    }
}

/// Provider of raw pages.
pub trait PageSource: Send + Sync {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Extract one page by zero-based index.
    fn page(&self, index: usize) -> Result<RawPage>;

    /// Document metadata.
    fn metadata(&self) -> Metadata {
        Metadata {
            page_count: self.page_count(),
            ..Default::default()
        }
    }
}

/// Page source over pages already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<RawPage>,
    metadata: Metadata,
}

impl MemorySource {
    /// Create a source over pages.
    pub fn new(pages: Vec<RawPage>) -> Self {
        let metadata = Metadata {
            page_count: pages.len(),
            ..Default::default()
        };
        Self { pages, metadata }
    }

    /// Set the metadata reported by the source.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<RawPage> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }

    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_normalizes_direction() {
        let edge = Edge::horizontal(100.0, 20.0, 50.0);
        assert_eq!(edge.x0, 20.0);
        assert_eq!(edge.x1, 100.0);
        assert_eq!(edge.length(), 80.0);

        let edge = Edge::vertical(10.0, 90.0, 30.0);
        assert_eq!(edge.top, 30.0);
        assert_eq!(edge.length(), 60.0);
    }

    #[test]
    fn test_rect_edges() {
        let edges = Edge::rect(0.0, 0.0, 100.0, 50.0);
        assert!(edges.iter().all(|e| e.source == EdgeSource::Rect));
        let horizontal = edges
            .iter()
            .filter(|e| e.orientation == Orientation::Horizontal)
            .count();
        assert_eq!(horizontal, 2);
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new(vec![RawPage::new(0, 612.0, 792.0)]);
        assert_eq!(source.page_count(), 1);
        assert_eq!(source.metadata().page_count, 1);
        assert!(source.page(0).is_ok());
        assert!(matches!(source.page(3), Err(Error::PageOutOfRange(3, 1))));
    }
}
