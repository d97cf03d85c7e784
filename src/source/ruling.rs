//! Table finding from ruling lines.
//!
//! Edges are snapped and joined, crossing points between horizontal and
//! vertical rules become grid corners, the smallest rectangles whose four
//! corners are connected by rules become cells, and cells sharing corners
//! are grouped into tables.

use std::collections::{HashMap, VecDeque};

use crate::layout::{group_words_by_line, FoundTable, Strategy, TableFinder, TableSettings};
use crate::model::{BBox, LineBlock, PositionedWord};

use super::{Edge, EdgeSource, Orientation, RawPage};

/// Line tolerance used when reassembling the words of one cell.
const CELL_LINE_TOLERANCE: f32 = 3.0;

/// [`TableFinder`] for tables drawn with ruling lines and rectangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RulingTableFinder;

impl RulingTableFinder {
    /// Create a ruling table finder.
    pub fn new() -> Self {
        Self
    }
}

impl TableFinder for RulingTableFinder {
    fn find_tables(&self, page: &RawPage, settings: &TableSettings) -> Vec<FoundTable> {
        let edges = prepare_edges(&page.edges, settings);
        let grid = Grid::from_edges(&edges, settings.intersection_tolerance);
        let cells = grid.cells();
        let tables: Vec<FoundTable> = group_cells(cells)
            .into_iter()
            .filter(|cells| cells.len() > 1)
            .map(|cells| extract_table(&cells, &page.words))
            .collect();

        log::debug!(
            "page {}: {} edges, {} corners, {} tables",
            page.index,
            edges.len(),
            grid.points.len(),
            tables.len()
        );
        tables
    }
}

/// Select, snap, join and filter a page's edges.
fn prepare_edges(edges: &[Edge], settings: &TableSettings) -> Vec<Edge> {
    let accepts = |edge: &Edge, strategy: Strategy| match strategy {
        Strategy::Lines => true,
        Strategy::LinesStrict => edge.source == EdgeSource::Line,
    };

    let vertical: Vec<Edge> = edges
        .iter()
        .filter(|e| e.orientation == Orientation::Vertical && accepts(e, settings.vertical_strategy))
        .copied()
        .collect();
    let horizontal: Vec<Edge> = edges
        .iter()
        .filter(|e| {
            e.orientation == Orientation::Horizontal && accepts(e, settings.horizontal_strategy)
        })
        .copied()
        .collect();

    let vertical = join_edges(snap_edges(vertical, settings.snap_tolerance), settings.join_tolerance);
    let horizontal = join_edges(
        snap_edges(horizontal, settings.snap_tolerance),
        settings.join_tolerance,
    );

    vertical
        .into_iter()
        .chain(horizontal)
        .filter(|e| e.length() >= settings.edge_min_length)
        .collect()
}

/// Position of an edge across its orientation.
fn position(edge: &Edge) -> f32 {
    match edge.orientation {
        Orientation::Horizontal => edge.top,
        Orientation::Vertical => edge.x0,
    }
}

/// Start and end of an edge along its orientation.
fn span(edge: &Edge) -> (f32, f32) {
    match edge.orientation {
        Orientation::Horizontal => (edge.x0, edge.x1),
        Orientation::Vertical => (edge.top, edge.bottom),
    }
}

fn set_position(edge: &mut Edge, value: f32) {
    match edge.orientation {
        Orientation::Horizontal => {
            edge.top = value;
            edge.bottom = value;
        }
        Orientation::Vertical => {
            edge.x0 = value;
            edge.x1 = value;
        }
    }
}

fn set_end(edge: &mut Edge, value: f32) {
    match edge.orientation {
        Orientation::Horizontal => edge.x1 = value,
        Orientation::Vertical => edge.bottom = value,
    }
}

/// Move parallel edges whose positions chain within `tolerance` onto the
/// cluster mean.
fn snap_edges(mut edges: Vec<Edge>, tolerance: f32) -> Vec<Edge> {
    if tolerance <= 0.0 || edges.is_empty() {
        return edges;
    }

    edges.sort_by(|a, b| position(a).total_cmp(&position(b)));

    let mut start = 0;
    for i in 1..=edges.len() {
        let split = i == edges.len() || position(&edges[i]) - position(&edges[i - 1]) > tolerance;
        if split {
            let cluster = &mut edges[start..i];
            let mean = cluster.iter().map(position).sum::<f32>() / cluster.len() as f32;
            for edge in cluster.iter_mut() {
                set_position(edge, mean);
            }
            start = i;
        }
    }
    edges
}

/// Join collinear edges at the same position that overlap or nearly touch.
fn join_edges(mut edges: Vec<Edge>, tolerance: f32) -> Vec<Edge> {
    edges.sort_by(|a, b| {
        position(a)
            .total_cmp(&position(b))
            .then(span(a).0.total_cmp(&span(b).0))
    });

    let mut joined: Vec<Edge> = Vec::with_capacity(edges.len());
    for edge in edges {
        match joined.last_mut() {
            Some(last)
                if position(last) == position(&edge) && span(&edge).0 <= span(last).1 + tolerance =>
            {
                if span(&edge).1 > span(last).1 {
                    set_end(last, span(&edge).1);
                }
            }
            _ => joined.push(edge),
        }
    }
    joined
}

/// Hashable key for a grid coordinate.
type PointKey = (i64, i64);

fn point_key(x: f32, y: f32) -> PointKey {
    ((x * 1000.0).round() as i64, (y * 1000.0).round() as i64)
}

#[derive(Debug, Clone)]
struct Corner {
    x: f32,
    y: f32,
    vertical: Vec<usize>,
    horizontal: Vec<usize>,
}

/// Crossing points of horizontal and vertical edges.
#[derive(Debug, Default)]
struct Grid {
    points: Vec<Corner>,
    index: HashMap<PointKey, usize>,
}

impl Grid {
    fn from_edges(edges: &[Edge], tolerance: f32) -> Self {
        let mut grid = Grid::default();

        for (vi, v) in edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.orientation == Orientation::Vertical)
        {
            for (hi, h) in edges
                .iter()
                .enumerate()
                .filter(|(_, e)| e.orientation == Orientation::Horizontal)
            {
                let crosses = v.top - tolerance <= h.top
                    && h.top <= v.bottom + tolerance
                    && h.x0 - tolerance <= v.x0
                    && v.x0 <= h.x1 + tolerance;
                if !crosses {
                    continue;
                }

                let key = point_key(v.x0, h.top);
                let id = *grid.index.entry(key).or_insert_with(|| {
                    grid.points.push(Corner {
                        x: v.x0,
                        y: h.top,
                        vertical: Vec::new(),
                        horizontal: Vec::new(),
                    });
                    grid.points.len() - 1
                });
                let corner = &mut grid.points[id];
                corner.vertical.push(vi);
                corner.horizontal.push(hi);
            }
        }

        for corner in &mut grid.points {
            corner.vertical.dedup();
            corner.horizontal.dedup();
        }
        grid
    }

    /// Whether two corners lie on one common edge.
    fn connected(&self, a: usize, b: usize) -> bool {
        let (p, q) = (&self.points[a], &self.points[b]);
        if p.x == q.x {
            p.vertical.iter().any(|e| q.vertical.contains(e))
        } else if p.y == q.y {
            p.horizontal.iter().any(|e| q.horizontal.contains(e))
        } else {
            false
        }
    }

    /// Smallest closed rectangles spanned by the corners.
    fn cells(&self) -> Vec<BBox> {
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by(|&a, &b| {
            let (p, q) = (&self.points[a], &self.points[b]);
            p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y))
        });

        let mut cells = Vec::new();
        for &id in &order {
            let corner = &self.points[id];

            let mut below: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&o| self.points[o].x == corner.x && self.points[o].y > corner.y)
                .collect();
            below.sort_by(|&a, &b| self.points[a].y.total_cmp(&self.points[b].y));

            let mut right: Vec<usize> = order
                .iter()
                .copied()
                .filter(|&o| self.points[o].y == corner.y && self.points[o].x > corner.x)
                .collect();
            right.sort_by(|&a, &b| self.points[a].x.total_cmp(&self.points[b].x));

            'below: for &b in &below {
                if !self.connected(id, b) {
                    continue;
                }
                for &r in &right {
                    if !self.connected(id, r) {
                        continue;
                    }
                    let key = point_key(self.points[r].x, self.points[b].y);
                    if let Some(&corner_id) = self.index.get(&key) {
                        if self.connected(corner_id, r) && self.connected(corner_id, b) {
                            cells.push(BBox::new(
                                corner.x,
                                corner.y,
                                self.points[r].x,
                                self.points[b].y,
                            ));
                            break 'below;
                        }
                    }
                }
            }
        }
        cells
    }
}

fn corners(cell: &BBox) -> [PointKey; 4] {
    [
        point_key(cell.x0, cell.top),
        point_key(cell.x0, cell.bottom),
        point_key(cell.x1, cell.top),
        point_key(cell.x1, cell.bottom),
    ]
}

/// Group cells into tables of cells connected through shared corners.
fn group_cells(cells: Vec<BBox>) -> Vec<Vec<BBox>> {
    let mut by_corner: HashMap<PointKey, Vec<usize>> = HashMap::new();
    for (i, cell) in cells.iter().enumerate() {
        for key in corners(cell) {
            by_corner.entry(key).or_default().push(i);
        }
    }

    let mut visited = vec![false; cells.len()];
    let mut groups = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..cells.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);

        let mut group = Vec::new();
        while let Some(i) = queue.pop_front() {
            group.push(cells[i]);
            for key in corners(&cells[i]) {
                for &neighbor in by_corner.get(&key).into_iter().flatten() {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        groups.push(group);
    }
    groups
}

/// Unique values in ascending order.
fn unique_sorted(mut values: Vec<f32>) -> Vec<f32> {
    values.sort_by(f32::total_cmp);
    values.dedup();
    values
}

/// Lay cells out on a row/column grid and fill in their text.
fn extract_table(cells: &[BBox], words: &[PositionedWord]) -> FoundTable {
    let rows = unique_sorted(cells.iter().map(|c| c.top).collect());
    let starts = unique_sorted(cells.iter().map(|c| c.x0).collect());

    let bbox = cells.iter().skip(1).fold(cells[0], |acc, c| {
        BBox::new(
            acc.x0.min(c.x0),
            acc.top.min(c.top),
            acc.x1.max(c.x1),
            acc.bottom.max(c.bottom),
        )
    });

    let mut grid: Vec<Vec<Option<String>>> = vec![vec![None; starts.len()]; rows.len()];
    for cell in cells {
        let row = rows.iter().position(|&t| t == cell.top);
        let col = starts.iter().position(|&x| x == cell.x0);
        if let (Some(row), Some(col)) = (row, col) {
            grid[row][col] = Some(cell_text(cell, words));
        }
    }

    let mut columns = starts;
    if columns.last().is_some_and(|&x| bbox.x1 > x) {
        columns.push(bbox.x1);
    }

    FoundTable {
        bbox,
        cells: grid,
        columns: Some(columns),
    }
}

/// Text of the words whose center lies in the cell, one line per text line.
fn cell_text(cell: &BBox, words: &[PositionedWord]) -> String {
    let inside: Vec<PositionedWord> = words
        .iter()
        .filter(|w| cell.contains_point(w.center_x(), w.center_y()))
        .cloned()
        .collect();

    group_words_by_line(inside, CELL_LINE_TOLERANCE)
        .iter()
        .map(LineBlock::text)
        .collect::<Vec<_>>()
        .join("\n")
}
