//! # Slab Partitioner
//!
//! Splits one floor plate into slab panels: one panel per grid bay (or
//! several when a custom beam spans the whole bay), plus one cantilever panel
//! per configured edge bay. Each panel is classified one-way or two-way from
//! its aspect ratio.
//!
//! ## Panel ids
//!
//! | Panel                          | Id              |
//! |--------------------------------|-----------------|
//! | Bay (i, j), 1-based            | `S{i}-{j}`      |
//! | Sub-panel of a split bay       | `S{i}-{j}.{a}.{b}` |
//! | Cantilever on an edge bay      | `C-{side}-{bay}` |
//!
//! Void references that no longer match a generated panel are pruned and
//! reported, so stale ids cannot silently zero out a different panel later.

use serde::{Deserialize, Serialize};

use super::diagnostics::{Diagnostic, Diagnostics};
use super::grid::Grid;
use crate::geometry::{Direction, Rect, Side, GEOMETRY_TOLERANCE_M};
use crate::model::{CustomBeam, FloorConfig};

/// Long/short span ratio at which a panel becomes one-way
pub const ONE_WAY_RATIO: f64 = 2.0;

/// Structural behaviour of a slab panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanType {
    /// Spans the short direction; load goes to the two long-side beams
    OneWay,
    /// Spans both ways; load goes to all four sides
    TwoWay,
}

/// Classify a panel from its plan dimensions.
///
/// A ratio of exactly 2.0 is one-way.
///
/// ```rust
/// use loadpath_core::calculations::slabs::{classify_span, SpanType};
/// assert_eq!(classify_span(4.0, 5.0), SpanType::TwoWay);
/// assert_eq!(classify_span(2.5, 5.0), SpanType::OneWay);
/// ```
pub fn classify_span(lx: f64, ly: f64) -> SpanType {
    let short = lx.min(ly);
    let long = lx.max(ly);
    if short <= 0.0 || long / short >= ONE_WAY_RATIO {
        SpanType::OneWay
    } else {
        SpanType::TwoWay
    }
}

/// Cantilever attachment of a panel that projects beyond the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CantileverPanel {
    pub side: Side,
    /// 0-based bay index along the edge
    pub bay: usize,
    pub length_m: f64,
    /// Grid beam along the edge bay that receives the full panel load
    pub edge_beam_id: String,
}

/// One slab panel of a floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabPanel {
    pub id: String,
    pub rect: Rect,
    pub area_m2: f64,
    pub span_type: SpanType,
    /// Set for panels projecting beyond the grid
    pub cantilever: Option<CantileverPanel>,
    /// Openings keep their geometry but carry no load
    pub is_void: bool,
}

impl SlabPanel {
    fn new(id: String, rect: Rect) -> Self {
        SlabPanel {
            id,
            area_m2: rect.area(),
            span_type: classify_span(rect.width(), rect.height()),
            rect,
            cantilever: None,
            is_void: false,
        }
    }

    pub fn is_cantilever(&self) -> bool {
        self.cantilever.is_some()
    }

    /// Area that contributes load
    pub fn loaded_area_m2(&self) -> f64 {
        if self.is_void {
            0.0
        } else {
            self.area_m2
        }
    }
}

/// Result of partitioning one floor
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub panels: Vec<SlabPanel>,
    /// Void ids in the floor config that matched no panel
    pub pruned_voids: Vec<String>,
}

/// Interior cut lines of a bay produced by custom beams spanning it fully.
/// Returns `(x cuts, y cuts)`, each sorted and de-duplicated.
pub fn bay_cuts(bay: &Rect, custom_beams: &[CustomBeam]) -> (Vec<f64>, Vec<f64>) {
    let tol = GEOMETRY_TOLERANCE_M;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for beam in custom_beams.iter().filter(|b| b.is_valid()) {
        let (a, b) = beam.extent();
        match beam.direction {
            Direction::X => {
                let inside = beam.offset > bay.y0 + tol && beam.offset < bay.y1 - tol;
                if inside && a <= bay.x0 + tol && b >= bay.x1 - tol {
                    ys.push(beam.offset);
                }
            }
            Direction::Y => {
                let inside = beam.offset > bay.x0 + tol && beam.offset < bay.x1 - tol;
                if inside && a <= bay.y0 + tol && b >= bay.y1 - tol {
                    xs.push(beam.offset);
                }
            }
        }
    }
    (dedup_sorted(xs), dedup_sorted(ys))
}

fn dedup_sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup_by(|a, b| (*a - *b).abs() <= GEOMETRY_TOLERANCE_M);
    values
}

fn bounds(lo: f64, cuts: &[f64], hi: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(cuts.len() + 2);
    out.push(lo);
    out.extend_from_slice(cuts);
    out.push(hi);
    out
}

/// Partition a floor into slab and cantilever panels.
///
/// Panels are produced in a fixed order: bays row by row (j outer, i inner),
/// then cantilevers by edge (bottom, top, left, right) and bay.
pub fn partition_floor(grid: &Grid, floor: &FloorConfig, diagnostics: &mut Diagnostics) -> Partition {
    let mut panels = Vec::new();

    for j in 0..grid.ny_bays() {
        for i in 0..grid.nx_bays() {
            let bay = grid.bay_rect(i, j);
            let (x_cuts, y_cuts) = bay_cuts(&bay, &floor.custom_beams);
            if x_cuts.is_empty() && y_cuts.is_empty() {
                panels.push(SlabPanel::new(format!("S{}-{}", i + 1, j + 1), bay));
                continue;
            }
            let xb = bounds(bay.x0, &x_cuts, bay.x1);
            let yb = bounds(bay.y0, &y_cuts, bay.y1);
            for b in 0..yb.len() - 1 {
                for a in 0..xb.len() - 1 {
                    let rect = Rect::new(xb[a], yb[b], xb[a + 1], yb[b + 1]);
                    panels.push(SlabPanel::new(format!("S{}-{}.{}.{}", i + 1, j + 1, a + 1, b + 1), rect));
                }
            }
        }
    }

    for side in Side::ALL {
        for bay in 0..grid.side_bays(side) {
            let length = floor.cantilevers.length(side, bay);
            if length <= 0.0 {
                continue;
            }
            let rect = grid.cantilever_rect(side, bay, length);
            let mut panel = SlabPanel::new(format!("C-{}-{}", side.name(), bay + 1), rect);
            panel.cantilever = Some(CantileverPanel {
                side,
                bay,
                length_m: length,
                edge_beam_id: grid.edge_beam_id(side, bay),
            });
            panels.push(panel);
        }
    }

    let mut pruned_voids = Vec::new();
    for void_id in &floor.void_panels {
        match panels.iter_mut().find(|p| &p.id == void_id) {
            Some(panel) => panel.is_void = true,
            None => pruned_voids.push(void_id.clone()),
        }
    }
    if !pruned_voids.is_empty() {
        diagnostics.push(Diagnostic::VoidPanelsPruned {
            floor_id: floor.id.clone(),
            panel_ids: pruned_voids.clone(),
        });
    }

    tracing::debug!(floor = %floor.id, panels = panels.len(), "floor partitioned");
    Partition { panels, pruned_voids }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CantileverConfig, SpanConfig};

    fn grid(x: Vec<f64>, y: Vec<f64>) -> Grid {
        Grid::from_spans(&SpanConfig::new(x, y), &mut Diagnostics::new())
    }

    #[test]
    fn test_classify_boundary_ratio() {
        assert_eq!(classify_span(3.0, 6.0), SpanType::OneWay);
        assert_eq!(classify_span(3.0, 5.99), SpanType::TwoWay);
        assert_eq!(classify_span(5.0, 5.0), SpanType::TwoWay);
        assert_eq!(classify_span(8.0, 3.0), SpanType::OneWay);
    }

    #[test]
    fn test_partition_bays() {
        let g = grid(vec![4.0, 4.0], vec![5.0, 5.0]);
        let floor = FloorConfig::new("L1", 1);
        let part = partition_floor(&g, &floor, &mut Diagnostics::new());
        let ids: Vec<&str> = part.panels.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["S1-1", "S2-1", "S1-2", "S2-2"]);
        let total: f64 = part.panels.iter().map(|p| p.area_m2).sum();
        assert!((total - 80.0).abs() < 1e-9);
        assert!(part.panels.iter().all(|p| p.span_type == SpanType::TwoWay));
    }

    #[test]
    fn test_cantilever_panels() {
        let g = grid(vec![4.0, 4.0], vec![5.0, 5.0]);
        let floor =
            FloorConfig::new("L1", 1).with_cantilevers(CantileverConfig::default().with(Side::Bottom, 1, 1.5));
        let part = partition_floor(&g, &floor, &mut Diagnostics::new());
        let cant = part.panels.iter().find(|p| p.id == "C-bottom-2").unwrap();
        assert!((cant.area_m2 - 6.0).abs() < 1e-9);
        let attach = cant.cantilever.as_ref().unwrap();
        assert_eq!(attach.edge_beam_id, "B1-C1");
        assert_eq!(cant.rect.y0, -1.5);
    }

    #[test]
    fn test_full_span_custom_beam_splits_bay() {
        let g = grid(vec![4.0], vec![6.0]);
        let floor = FloorConfig::new("L1", 1).with_custom_beam(CustomBeam::new("CB1", Direction::X, 3.0, 0.0, 4.0));
        let part = partition_floor(&g, &floor, &mut Diagnostics::new());
        let ids: Vec<&str> = part.panels.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["S1-1.1.1", "S1-1.1.2"]);
        assert!((part.panels[0].area_m2 - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_custom_beam_does_not_split() {
        let g = grid(vec![4.0], vec![6.0]);
        let floor = FloorConfig::new("L1", 1).with_custom_beam(CustomBeam::new("CB1", Direction::X, 3.0, 0.0, 2.0));
        let part = partition_floor(&g, &floor, &mut Diagnostics::new());
        assert_eq!(part.panels.len(), 1);
    }

    #[test]
    fn test_stale_voids_pruned() {
        let g = grid(vec![4.0], vec![5.0]);
        let floor = FloorConfig::new("L1", 1).with_void("S1-1").with_void("S3-3");
        let mut diags = Diagnostics::new();
        let part = partition_floor(&g, &floor, &mut diags);
        assert!(part.panels[0].is_void);
        assert_eq!(part.panels[0].loaded_area_m2(), 0.0);
        assert_eq!(part.pruned_voids, vec!["S3-3".to_string()]);
        assert_eq!(diags.len(), 1);
    }
}
