//! Table types.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in top-left page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl BBox {
    /// Create a bounding box.
    pub fn new(x0: f32, top: f32, x1: f32, bottom: f32) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width in points.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height in points.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Check whether a point lies inside the box (edges inclusive).
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.top && y <= self.bottom
    }
}

/// A table detected on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Table bounds
    pub bbox: BBox,

    /// Cell text, row-major. `None` marks a grid position without a cell.
    pub cells: Vec<Vec<Option<String>>>,

    /// X coordinates of the column rules, `columns + 1` entries when known
    pub column_boundaries: Option<Vec<f32>>,
}

impl TableBlock {
    /// Create a table block.
    pub fn new(bbox: BBox, cells: Vec<Vec<Option<String>>>) -> Self {
        Self {
            bbox,
            cells,
            column_boundaries: None,
        }
    }

    /// Attach column boundaries.
    pub fn with_column_boundaries(mut self, boundaries: Vec<f32>) -> Self {
        self.column_boundaries = Some(boundaries);
        self
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns, taken from the widest row.
    pub fn column_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rows padded to [`column_count`](Self::column_count) with empty strings.
    ///
    /// Missing cells and short rows both render as `""`.
    pub fn padded_rows(&self) -> Vec<Vec<String>> {
        let columns = self.column_count();
        self.cells
            .iter()
            .map(|row| {
                let mut out: Vec<String> = row
                    .iter()
                    .map(|cell| cell.clone().unwrap_or_default())
                    .collect();
                out.resize(columns, String::new());
                out
            })
            .collect()
    }

    /// Tab-separated text, one row per line.
    pub fn plain_text(&self) -> String {
        self.padded_rows()
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_bbox_contains() {
        let bbox = BBox::new(10.0, 20.0, 110.0, 70.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 50.0);
        assert!(bbox.contains_point(10.0, 20.0));
        assert!(bbox.contains_point(60.0, 45.0));
        assert!(!bbox.contains_point(9.9, 45.0));
        assert!(!bbox.contains_point(60.0, 70.1));
    }

    #[test]
    fn test_padded_rows_ragged() {
        let table = TableBlock::new(
            BBox::new(0.0, 0.0, 100.0, 40.0),
            vec![
                vec![cell("A"), cell("B"), cell("C")],
                vec![cell("D")],
                vec![None, cell("F")],
            ],
        );

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(
            table.padded_rows(),
            vec![
                vec!["A".to_string(), "B".to_string(), "C".to_string()],
                vec!["D".to_string(), String::new(), String::new()],
                vec![String::new(), "F".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn test_plain_text() {
        let table = TableBlock::new(
            BBox::new(0.0, 0.0, 100.0, 40.0),
            vec![vec![cell("A"), cell("B")], vec![cell("C"), cell("D")]],
        );
        assert_eq!(table.plain_text(), "A\tB\nC\tD");
    }

    #[test]
    fn test_empty_table() {
        let table = TableBlock::new(BBox::new(0.0, 0.0, 0.0, 0.0), vec![]);
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
        assert!(table.padded_rows().is_empty());
    }
}
