//! Table detection: normalizes grids found by a [`TableFinder`] into
//! [`TableBlock`]s.

use std::sync::Arc;

use crate::model::{BBox, TableBlock};
use crate::source::RawPage;

/// Where a table finder takes its row or column separators from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Ruling lines, including the sides of drawn rectangles
    #[default]
    Lines,
    /// Only stroked line segments; rectangle sides are ignored
    LinesStrict,
}

/// Table finder configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    /// Source of column separators
    pub vertical_strategy: Strategy,
    /// Source of row separators
    pub horizontal_strategy: Strategy,
    /// Max gap in points for a horizontal and vertical rule to count as crossing
    pub intersection_tolerance: f32,
    /// Parallel rules closer than this are snapped onto one coordinate
    pub snap_tolerance: f32,
    /// Collinear rules with gaps up to this are joined
    pub join_tolerance: f32,
    /// Rules shorter than this are ignored
    pub edge_min_length: f32,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: Strategy::Lines,
            horizontal_strategy: Strategy::Lines,
            intersection_tolerance: 5.0,
            snap_tolerance: 3.0,
            join_tolerance: 3.0,
            edge_min_length: 3.0,
        }
    }
}

/// A table as reported by a table finder.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundTable {
    /// Table bounds
    pub bbox: BBox,
    /// Cell text, row-major
    pub cells: Vec<Vec<Option<String>>>,
    /// Column rule x coordinates, if the finder knows them
    pub columns: Option<Vec<f32>>,
}

/// Grid-detection primitive.
///
/// Implementations locate ruled tables on a page and extract their cell text.
pub trait TableFinder: Send + Sync {
    /// Find tables on a page.
    fn find_tables(&self, page: &RawPage, settings: &TableSettings) -> Vec<FoundTable>;
}

/// Runs a [`TableFinder`] and normalizes its output.
#[derive(Clone)]
pub struct TableDetector {
    finder: Arc<dyn TableFinder>,
    settings: TableSettings,
}

impl TableDetector {
    /// Create a detector over a finder.
    pub fn new(finder: Arc<dyn TableFinder>, settings: TableSettings) -> Self {
        Self { finder, settings }
    }

    /// Settings passed to the finder.
    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// Detect tables on a page, ordered top to bottom then left to right.
    ///
    /// Tables without rows are dropped. Column boundaries are kept only when
    /// they are strictly increasing.
    pub fn detect(&self, page: &RawPage) -> Vec<TableBlock> {
        let mut tables: Vec<TableBlock> = self
            .finder
            .find_tables(page, &self.settings)
            .into_iter()
            .filter_map(|found| {
                if found.cells.is_empty() {
                    log::debug!(
                        "page {}: dropping table without rows at {:?}",
                        page.index,
                        found.bbox
                    );
                    return None;
                }

                let mut table = TableBlock::new(found.bbox, found.cells);
                if let Some(columns) = found.columns.filter(|c| is_strictly_increasing(c)) {
                    table = table.with_column_boundaries(columns);
                }
                Some(table)
            })
            .collect();

        tables.sort_by(|a, b| {
            a.bbox
                .top
                .total_cmp(&b.bbox.top)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        log::debug!("page {}: detected {} tables", page.index, tables.len());
        tables
    }
}

impl std::fmt::Debug for TableDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableDetector")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn is_strictly_increasing(values: &[f32]) -> bool {
    values.len() >= 2 && values.windows(2).all(|w| w[0] < w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedFinder(Vec<FoundTable>);

    impl TableFinder for FixedFinder {
        fn find_tables(&self, _page: &RawPage, _settings: &TableSettings) -> Vec<FoundTable> {
            self.0.clone()
        }
    }

    fn found(top: f32, x0: f32, rows: usize, columns: Option<Vec<f32>>) -> FoundTable {
        FoundTable {
            bbox: BBox::new(x0, top, x0 + 100.0, top + 40.0),
            cells: vec![vec![Some("x".to_string())]; rows],
            columns,
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = TableSettings::default();
        assert_eq!(settings.vertical_strategy, Strategy::Lines);
        assert_eq!(settings.horizontal_strategy, Strategy::Lines);
        assert_eq!(settings.intersection_tolerance, 5.0);
    }

    #[test]
    fn test_detect_orders_and_filters() {
        let finder = FixedFinder(vec![
            found(300.0, 0.0, 2, None),
            found(100.0, 200.0, 1, Some(vec![200.0, 250.0, 300.0])),
            found(100.0, 50.0, 0, None),
            found(100.0, 10.0, 1, Some(vec![10.0, 10.0])),
        ]);
        let detector = TableDetector::new(Arc::new(finder), TableSettings::default());
        let page = RawPage::new(0, 612.0, 792.0);

        let tables = detector.detect(&page);
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].bbox.x0, 10.0);
        assert!(tables[0].column_boundaries.is_none());
        assert_eq!(tables[1].bbox.x0, 200.0);
        assert_eq!(
            tables[1].column_boundaries,
            Some(vec![200.0, 250.0, 300.0])
        );
        assert_eq!(tables[2].bbox.top, 300.0);
    }

    #[test]
    fn test_strictly_increasing() {
        assert!(is_strictly_increasing(&[0.0, 100.0, 250.0]));
        assert!(!is_strictly_increasing(&[0.0]));
        assert!(!is_strictly_increasing(&[0.0, 100.0, 100.0]));
    }
}
