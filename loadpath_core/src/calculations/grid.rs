//! # Grid Builder
//!
//! Turns the span sequences into absolute grid coordinates and generates the
//! column set. Grid columns get stable ids from their grid position (letter
//! for the X line, number for the Y line), so the persistent override map in
//! [`BuildingModel::column_overrides`] keeps applying to the same column as
//! long as its grid position exists.
//!
//! ## Notation
//!
//! ```text
//!   y
//!   ^  A3 ---- B3 ---- C3        X lines: A, B, C, ... (I and O skipped)
//!   |  |       |       |         Y lines: 1, 2, 3, ...
//!   |  A2 ---- B2 ---- C2        Bay (i, j) lies between X lines i, i+1
//!   |  |       |       |         and Y lines j, j+1 (0-based)
//!   |  A1 ---- B1 ---- C1
//!   +-------------------------> x
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::beams::Support;
use super::columns::{Column, ColumnClass};
use super::diagnostics::{Diagnostic, Diagnostics};
use crate::geometry::{Point, Rect, Side, GEOMETRY_TOLERANCE_M};
use crate::model::{BuildingModel, SpanConfig};

/// Grid line letters; I and O are skipped because they read as 1 and 0
const COLUMN_LETTERS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Position of a grid intersection (0-based X line, 0-based Y line)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridIndex {
    pub i: usize,
    pub j: usize,
}

impl GridIndex {
    pub fn new(i: usize, j: usize) -> Self {
        GridIndex { i, j }
    }
}

/// Letter label of an X grid line: A..Z without I/O, then AA, AB, ...
///
/// ```rust
/// use loadpath_core::calculations::grid::column_letter;
/// assert_eq!(column_letter(0), "A");
/// assert_eq!(column_letter(8), "J");
/// assert_eq!(column_letter(24), "AA");
/// ```
pub fn column_letter(i: usize) -> String {
    let base = COLUMN_LETTERS.len();
    let mut n = i + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(COLUMN_LETTERS[n % base] as char);
        n /= base;
    }
    letters.iter().rev().collect()
}

/// Stable id of the column at a grid intersection, e.g. `B2`
pub fn column_id(index: GridIndex) -> String {
    format!("{}{}", column_letter(index.i), index.j + 1)
}

/// Stable id of the grid beam between two intersections, e.g. `A1-B1`
pub fn grid_beam_id(a: GridIndex, b: GridIndex) -> String {
    format!("{}-{}", column_id(a), column_id(b))
}

/// Absolute grid geometry derived from sanitized spans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Spans after sanitizing
    pub spans: SpanConfig,
    /// Cumulative X line coordinates, starting at 0.0
    pub xs: Vec<f64>,
    /// Cumulative Y line coordinates, starting at 0.0
    pub ys: Vec<f64>,
}

fn cumulative(spans: &[f64]) -> Vec<f64> {
    let mut coords = Vec::with_capacity(spans.len() + 1);
    let mut acc = 0.0;
    coords.push(acc);
    for span in spans {
        acc += span;
        coords.push(acc);
    }
    coords
}

impl Grid {
    /// Build grid coordinates; clamped spans are reported, never rejected.
    pub fn from_spans(spans: &SpanConfig, diagnostics: &mut Diagnostics) -> Self {
        let (clean, clamped) = spans.sanitized();
        for c in clamped {
            diagnostics.push(Diagnostic::SpanClamped {
                direction: c.direction,
                index: c.index,
                value: c.value,
                replacement: c.replacement,
            });
        }
        let xs = cumulative(&clean.x);
        let ys = cumulative(&clean.y);
        Grid { spans: clean, xs, ys }
    }

    pub fn nx_bays(&self) -> usize {
        self.spans.x.len()
    }

    pub fn ny_bays(&self) -> usize {
        self.spans.y.len()
    }

    pub fn width(&self) -> f64 {
        self.xs.last().copied().unwrap_or(0.0)
    }

    pub fn depth(&self) -> f64 {
        self.ys.last().copied().unwrap_or(0.0)
    }

    pub fn point(&self, index: GridIndex) -> Point {
        Point::new(self.xs[index.i], self.ys[index.j])
    }

    pub fn bay_rect(&self, i: usize, j: usize) -> Rect {
        Rect::new(self.xs[i], self.ys[j], self.xs[i + 1], self.ys[j + 1])
    }

    pub fn longest_span(&self) -> f64 {
        self.spans
            .x
            .iter()
            .chain(self.spans.y.iter())
            .copied()
            .fold(0.0, f64::max)
    }

    /// Mean of every X and Y span
    pub fn average_span(&self) -> f64 {
        let count = self.spans.x.len() + self.spans.y.len();
        if count == 0 {
            return 0.0;
        }
        (self.spans.total_x() + self.spans.total_y()) / count as f64
    }

    /// Number of bays along one grid edge
    pub fn side_bays(&self, side: Side) -> usize {
        match side {
            Side::Bottom | Side::Top => self.nx_bays(),
            Side::Left | Side::Right => self.ny_bays(),
        }
    }

    /// The `k`-th grid intersection along an edge (k = 0..=side_bays)
    pub fn edge_node(&self, side: Side, k: usize) -> GridIndex {
        match side {
            Side::Bottom => GridIndex::new(k, 0),
            Side::Top => GridIndex::new(k, self.ny_bays()),
            Side::Left => GridIndex::new(0, k),
            Side::Right => GridIndex::new(self.nx_bays(), k),
        }
    }

    /// Id of the grid beam along an edge bay, which carries that bay's cantilever
    pub fn edge_beam_id(&self, side: Side, bay: usize) -> String {
        grid_beam_id(self.edge_node(side, bay), self.edge_node(side, bay + 1))
    }

    /// Outward unit vector of a grid edge
    pub fn outward(side: Side) -> (f64, f64) {
        match side {
            Side::Bottom => (0.0, -1.0),
            Side::Top => (0.0, 1.0),
            Side::Left => (-1.0, 0.0),
            Side::Right => (1.0, 0.0),
        }
    }

    /// Rectangle of a cantilever slab projecting `length` beyond an edge bay
    pub fn cantilever_rect(&self, side: Side, bay: usize, length: f64) -> Rect {
        let (w, h) = (self.width(), self.depth());
        match side {
            Side::Bottom => Rect::new(self.xs[bay], -length, self.xs[bay + 1], 0.0),
            Side::Top => Rect::new(self.xs[bay], h, self.xs[bay + 1], h + length),
            Side::Left => Rect::new(-length, self.ys[bay], 0.0, self.ys[bay + 1]),
            Side::Right => Rect::new(w, self.ys[bay], w + length, self.ys[bay + 1]),
        }
    }

    pub fn classify_index(&self, index: GridIndex) -> ColumnClass {
        let on_x = index.i == 0 || index.i == self.nx_bays();
        let on_y = index.j == 0 || index.j == self.ny_bays();
        ColumnClass::from_boundaries(on_x, on_y)
    }

    /// Class of an off-grid point by boundary proximity; points outside the
    /// grid rectangle count as edge columns.
    pub fn classify_point(&self, p: Point) -> ColumnClass {
        let tol = GEOMETRY_TOLERANCE_M;
        let outside = p.x < -tol || p.y < -tol || p.x > self.width() + tol || p.y > self.depth() + tol;
        if outside {
            return ColumnClass::Edge;
        }
        let on_x = p.x.abs() <= tol || (p.x - self.width()).abs() <= tol;
        let on_y = p.y.abs() <= tol || (p.y - self.depth()).abs() <= tol;
        ColumnClass::from_boundaries(on_x, on_y)
    }

    /// Total length of all grid lines (m), used for tie beam quantities
    pub fn total_grid_line_length(&self) -> f64 {
        (self.ny_bays() + 1) as f64 * self.width() + (self.nx_bays() + 1) as f64 * self.depth()
    }
}

/// Generate the column set for a grid and merge the persistent overrides.
///
/// Grid columns come first in row order (A1, B1, ..., A2, ...), followed by
/// planted columns in model order. A planted column that lands on a grid
/// intersection is merged onto that grid column instead of duplicating it.
pub fn build_columns(grid: &Grid, model: &BuildingModel, diagnostics: &mut Diagnostics) -> Vec<Column> {
    let mut columns = Vec::with_capacity(grid.xs.len() * grid.ys.len() + model.planted_columns.len());

    for j in 0..grid.ys.len() {
        for i in 0..grid.xs.len() {
            let index = GridIndex::new(i, j);
            let mut column = Column::new(column_id(index), grid.point(index), Some(index), grid.classify_index(index));
            if let Some(overrides) = model.column_overrides.get(&column.id) {
                column.apply_override(overrides);
            }
            columns.push(column);
        }
    }

    for planted in &model.planted_columns {
        if let Some(existing) = columns.iter_mut().find(|c| c.position.coincides(&planted.position)) {
            if existing.start_floor.is_none() {
                existing.start_floor = planted.start_floor.clone();
            }
            diagnostics.push(Diagnostic::PlantedColumnMerged {
                planted_id: planted.id.clone(),
                column_id: existing.id.clone(),
            });
            continue;
        }
        let mut column = Column::new(
            planted.id.clone(),
            planted.position,
            None,
            grid.classify_point(planted.position),
        );
        column.start_floor = planted.start_floor.clone();
        if let Some(overrides) = model.column_overrides.get(&planted.id) {
            column.apply_override(overrides);
        }
        columns.push(column);
    }

    tracing::debug!(columns = columns.len(), nx = grid.nx_bays(), ny = grid.ny_bays(), "grid built");
    columns
}

/// Index from grid position and id to a column's slot in the column list
#[derive(Debug, Clone, Default)]
pub struct ColumnLookup {
    by_grid: BTreeMap<GridIndex, usize>,
    by_id: BTreeMap<String, usize>,
}

impl ColumnLookup {
    pub fn new(columns: &[Column]) -> Self {
        let mut lookup = ColumnLookup::default();
        for (slot, column) in columns.iter().enumerate() {
            if let Some(index) = column.grid_index {
                lookup.by_grid.entry(index).or_insert(slot);
            }
            lookup.by_id.entry(column.id.clone()).or_insert(slot);
        }
        lookup
    }

    pub fn by_id(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn by_grid(&self, index: GridIndex) -> Option<usize> {
        self.by_grid.get(&index).copied()
    }

    /// Column slot a beam end is supported by, if any
    pub fn resolve(&self, support: &Support) -> Option<usize> {
        match support {
            Support::Grid(index) => self.by_grid(*index),
            Support::Column(id) => self.by_id(id),
            Support::Free => None,
        }
    }
}
