//! Merging of text lines and tables into a single reading order.

use crate::model::{ContentBlock, LineBlock, TableBlock};

/// Merge lines and tables into one top-to-bottom sequence.
///
/// The sort is stable and lines are placed before tables beforehand, so a
/// line and a table starting at the same top keep text first.
pub fn compose_page(lines: Vec<LineBlock>, tables: Vec<TableBlock>) -> Vec<ContentBlock> {
    let mut blocks: Vec<ContentBlock> = lines
        .into_iter()
        .map(ContentBlock::Text)
        .chain(tables.into_iter().map(ContentBlock::Table))
        .collect();

    blocks.sort_by(|a, b| a.top().total_cmp(&b.top()));
    blocks
}

/// Remove lines whose midpoint falls inside one of the tables.
///
/// Those words already appear as cell text.
pub fn drop_lines_inside_tables(lines: Vec<LineBlock>, tables: &[TableBlock]) -> Vec<LineBlock> {
    if tables.is_empty() {
        return lines;
    }

    lines
        .into_iter()
        .filter(|line| {
            let y = (line.top() + line.bottom()) / 2.0;
            !tables
                .iter()
                .any(|table| table.bbox.contains_point(line.center_x(), y))
        })
        .collect()
}
