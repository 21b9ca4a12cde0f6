//! # Tributary Distributor
//!
//! Assigns every loaded slab panel's area to beams.
//!
//! ## Rules
//!
//! - **Two-way panel**: 45° yield lines from each corner. The two short
//!   sides get triangles, the two long sides trapezoids (a square panel gets
//!   four triangles). Each piece goes to the beam bounding that side.
//! - **One-way panel**: the slab spans the short direction, so the panel is
//!   halved along its long axis and each half goes to the long-side beam.
//! - **Partial custom beam**: a custom beam crossing a panel without spanning
//!   it picks up an additive strip; the panel's own pieces are not reduced.
//! - **Cantilever panel**: the full area goes to the grid edge beam; the two
//!   halves also load the bracketing cantilever beams, which carry them to
//!   their root columns.
//!
//! ```text
//!   +-----------------------+       two-way, lx < ly:
//!   |\         top         /|       h = min(lx, ly) / 2
//!   |  \                 /  |
//!   |    \_____________/    |       bottom/top: triangles  (lx·h / 2)
//!   |left|             |right       left/right: trapezoids (h·(2ly − lx) / 2)
//!   |    /‾‾‾‾‾‾‾‾‾‾‾‾‾\    |
//!   |  /     bottom      \  |
//!   +-----------------------+
//! ```

use serde::{Deserialize, Serialize};

use super::beams::{Beam, BeamKind};
use super::diagnostics::{Diagnostic, Diagnostics};
use super::slabs::{CantileverPanel, SlabPanel, SpanType};
use crate::geometry::{Direction, Point, Polygon, Rect, Side, GEOMETRY_TOLERANCE_M};
use crate::model::{CustomBeam, FloorConfig};

/// Area below which a missing allocation is treated as round-off (m²)
const AREA_EPSILON_M2: f64 = 1e-9;

/// Shape of a tributary piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliceTag {
    Triangle,
    Trapezoid,
    OneWayHalf,
    CustomStrip,
    CantileverFull,
    CantileverHalf,
}

/// A piece of a slab panel assigned to one beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TributarySlice {
    pub panel_id: String,
    /// Panel side the piece belongs to, when it has one
    pub side: Option<Side>,
    pub tag: SliceTag,
    pub polygon: Polygon,
    pub area_m2: f64,
}

/// One side's share of a panel, before it is matched to a beam
#[derive(Debug, Clone, PartialEq)]
pub struct PanelShare {
    pub side: Side,
    pub tag: SliceTag,
    pub polygon: Polygon,
    pub area_m2: f64,
}

/// Split a panel into per-side shares. Share areas always sum to the
/// panel area.
pub fn decompose_panel(rect: &Rect, span_type: SpanType) -> Vec<PanelShare> {
    let raw = match span_type {
        SpanType::TwoWay => two_way_shares(rect),
        SpanType::OneWay => one_way_shares(rect),
    };
    let total: f64 = raw.iter().map(|s| s.area_m2).sum();
    let scale = if total > 0.0 { rect.area() / total } else { 0.0 };
    raw.into_iter()
        .map(|mut share| {
            share.area_m2 *= scale;
            share
        })
        .collect()
}

fn two_way_shares(rect: &Rect) -> Vec<PanelShare> {
    let h = rect.width().min(rect.height()) / 2.0;
    Side::ALL
        .iter()
        .map(|&side| {
            let edge = rect.side(side);
            let (c1, c2) = (edge.start, edge.end);
            // Corners moved h along the 45° inward diagonal
            let (c1_in, c2_in) = match side {
                Side::Bottom => (Point::new(c1.x + h, c1.y + h), Point::new(c2.x - h, c2.y + h)),
                Side::Top => (Point::new(c1.x + h, c1.y - h), Point::new(c2.x - h, c2.y - h)),
                Side::Left => (Point::new(c1.x + h, c1.y + h), Point::new(c2.x + h, c2.y - h)),
                Side::Right => (Point::new(c1.x - h, c1.y + h), Point::new(c2.x - h, c2.y - h)),
            };
            let polygon = Polygon::new(vec![c1, c2, c2_in, c1_in]);
            let tag = if edge.length() - 2.0 * h <= AREA_EPSILON_M2 {
                SliceTag::Triangle
            } else {
                SliceTag::Trapezoid
            };
            PanelShare {
                side,
                tag,
                area_m2: polygon.area(),
                polygon,
            }
        })
        .collect()
}

fn one_way_shares(rect: &Rect) -> Vec<PanelShare> {
    let halves = if rect.width() >= rect.height() {
        let ym = (rect.y0 + rect.y1) / 2.0;
        [
            (Side::Bottom, Rect::new(rect.x0, rect.y0, rect.x1, ym)),
            (Side::Top, Rect::new(rect.x0, ym, rect.x1, rect.y1)),
        ]
    } else {
        let xm = (rect.x0 + rect.x1) / 2.0;
        [
            (Side::Left, Rect::new(rect.x0, rect.y0, xm, rect.y1)),
            (Side::Right, Rect::new(xm, rect.y0, rect.x1, rect.y1)),
        ]
    };
    halves
        .into_iter()
        .map(|(side, half)| PanelShare {
            side,
            tag: SliceTag::OneWayHalf,
            area_m2: half.area(),
            polygon: half.to_polygon(),
        })
        .collect()
}

/// Strip of a panel picked up by a custom beam that crosses it without
/// spanning it. Returns the strip polygon and its area.
///
/// On each side of the beam the strip width is the lesser of the distance to
/// the panel edge and half the panel dimension perpendicular to the beam;
/// the strip area is `overlap × (w1 + w2) / 2`.
pub fn crossing_strip(rect: &Rect, beam: &CustomBeam) -> Option<(Polygon, f64)> {
    if !beam.is_valid() {
        return None;
    }
    let tol = GEOMETRY_TOLERANCE_M;
    let (a, b) = beam.extent();
    // Work in beam-local axes: u along the beam, v across it
    let (u0, u1, v0, v1) = match beam.direction {
        Direction::X => (rect.x0, rect.x1, rect.y0, rect.y1),
        Direction::Y => (rect.y0, rect.y1, rect.x0, rect.x1),
    };
    let v = beam.offset;
    if v <= v0 + tol || v >= v1 - tol {
        return None;
    }
    let (o0, o1) = (a.max(u0), b.min(u1));
    let overlap = o1 - o0;
    if overlap <= tol {
        return None;
    }
    if a <= u0 + tol && b >= u1 - tol {
        // Spans the panel; the partitioner already split it here
        return None;
    }
    let half = (v1 - v0) / 2.0;
    let w1 = (v - v0).min(half);
    let w2 = (v1 - v).min(half);
    let area = overlap * (w1 + w2) / 2.0;
    let (s0, s1) = (v - w1 / 2.0, v + w2 / 2.0);
    let strip = match beam.direction {
        Direction::X => Rect::new(o0, s0, o1, s1),
        Direction::Y => Rect::new(s0, o0, s1, o1),
    };
    Some((strip.to_polygon(), area))
}

fn bounding_beam(beams: &[Beam], rect: &Rect, side: Side) -> Option<usize> {
    let edge = rect.side(side);
    beams
        .iter()
        .position(|b| !b.kind.is_cantilever() && b.segment().covers(&edge))
}

/// Distribute every loaded panel of a floor onto the floor's beams.
pub fn distribute_floor(floor: &FloorConfig, panels: &[SlabPanel], beams: &mut [Beam], diagnostics: &mut Diagnostics) {
    for panel in panels.iter().filter(|p| !p.is_void) {
        if let Some(cantilever) = &panel.cantilever {
            assign_cantilever(floor, panel, cantilever, beams, diagnostics);
            continue;
        }

        let mut missing = 0.0;
        for share in decompose_panel(&panel.rect, panel.span_type) {
            match bounding_beam(beams, &panel.rect, share.side) {
                Some(slot) => beams[slot].add_slice(TributarySlice {
                    panel_id: panel.id.clone(),
                    side: Some(share.side),
                    tag: share.tag,
                    polygon: share.polygon,
                    area_m2: share.area_m2,
                }),
                None => missing += share.area_m2,
            }
        }
        if missing > AREA_EPSILON_M2 {
            diagnostics.push(Diagnostic::PanelUnderAllocated {
                floor_id: floor.id.clone(),
                panel_id: panel.id.clone(),
                missing_area_m2: missing,
            });
        }

        for custom in &floor.custom_beams {
            let Some((polygon, area)) = crossing_strip(&panel.rect, custom) else {
                continue;
            };
            let Some(beam) = beams.iter_mut().find(|b| b.id == custom.id) else {
                continue;
            };
            beam.add_slice(TributarySlice {
                panel_id: panel.id.clone(),
                side: None,
                tag: SliceTag::CustomStrip,
                polygon,
                area_m2: area,
            });
            diagnostics.push(Diagnostic::CustomBeamStrip {
                floor_id: floor.id.clone(),
                beam_id: custom.id.clone(),
                panel_id: panel.id.clone(),
                area_m2: area,
            });
        }
    }
}

fn assign_cantilever(
    floor: &FloorConfig,
    panel: &SlabPanel,
    cantilever: &CantileverPanel,
    beams: &mut [Beam],
    diagnostics: &mut Diagnostics,
) {
    match beams.iter_mut().find(|b| b.id == cantilever.edge_beam_id) {
        Some(edge) => edge.add_slice(TributarySlice {
            panel_id: panel.id.clone(),
            side: Some(cantilever.side.opposite()),
            tag: SliceTag::CantileverFull,
            polygon: panel.rect.to_polygon(),
            area_m2: panel.area_m2,
        }),
        None => diagnostics.push(Diagnostic::CantileverWithoutEdgeBeam {
            floor_id: floor.id.clone(),
            panel_id: panel.id.clone(),
            edge_beam_id: cantilever.edge_beam_id.clone(),
        }),
    }

    let r = panel.rect;
    let root = r.side(cantilever.side.opposite());
    let halves = match cantilever.side.direction() {
        Direction::X => {
            let xm = (r.x0 + r.x1) / 2.0;
            [
                (root.start, Rect::new(r.x0, r.y0, xm, r.y1)),
                (root.end, Rect::new(xm, r.y0, r.x1, r.y1)),
            ]
        }
        Direction::Y => {
            let ym = (r.y0 + r.y1) / 2.0;
            [
                (root.start, Rect::new(r.x0, r.y0, r.x1, ym)),
                (root.end, Rect::new(r.x0, ym, r.x1, r.y1)),
            ]
        }
    };
    for (corner, half) in halves {
        let bracket = beams.iter_mut().find(|b| {
            matches!(b.kind, BeamKind::Cantilever { side, .. } if side == cantilever.side)
                && b.start.coincides(&corner)
        });
        if let Some(beam) = bracket {
            beam.add_slice(TributarySlice {
                panel_id: panel.id.clone(),
                side: Some(cantilever.side),
                tag: SliceTag::CantileverHalf,
                polygon: half.to_polygon(),
                area_m2: half.area(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::beams::generate_beams;
    use crate::calculations::grid::{build_columns, Grid};
    use crate::calculations::slabs::partition_floor;
    use crate::model::{BuildingModel, CantileverConfig, SpanConfig};
    use approx::assert_relative_eq;

    fn run(spans: SpanConfig, floor: &FloorConfig) -> (Vec<SlabPanel>, Vec<Beam>, Diagnostics) {
        let model = BuildingModel::new(spans);
        let mut diags = Diagnostics::new();
        let grid = Grid::from_spans(&model.spans, &mut diags);
        let columns = build_columns(&grid, &model, &mut diags);
        let part = partition_floor(&grid, floor, &mut diags);
        let mut beams = generate_beams(&grid, floor, &columns, &part.panels, &mut diags);
        distribute_floor(floor, &part.panels, &mut beams, &mut diags);
        (part.panels, beams, diags)
    }

    fn beam<'a>(beams: &'a [Beam], id: &str) -> &'a Beam {
        beams.iter().find(|b| b.id == id).unwrap()
    }

    #[test]
    fn test_two_way_shares() {
        let shares = decompose_panel(&Rect::new(0.0, 0.0, 4.0, 5.0), SpanType::TwoWay);
        assert_eq!(shares.len(), 4);
        assert_relative_eq!(shares[0].area_m2, 4.0, epsilon = 1e-9);
        assert_eq!(shares[0].tag, SliceTag::Triangle);
        assert_relative_eq!(shares[2].area_m2, 6.0, epsilon = 1e-9);
        assert_eq!(shares[2].tag, SliceTag::Trapezoid);
        let total: f64 = shares.iter().map(|s| s.area_m2).sum();
        assert_relative_eq!(total, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_square_panel_four_triangles() {
        let shares = decompose_panel(&Rect::new(0.0, 0.0, 5.0, 5.0), SpanType::TwoWay);
        assert!(shares.iter().all(|s| s.tag == SliceTag::Triangle));
        assert!(shares.iter().all(|s| (s.area_m2 - 6.25).abs() < 1e-9));
    }

    #[test]
    fn test_one_way_goes_to_long_sides() {
        let shares = decompose_panel(&Rect::new(0.0, 0.0, 6.0, 2.0), SpanType::OneWay);
        let sides: Vec<Side> = shares.iter().map(|s| s.side).collect();
        assert_eq!(sides, vec![Side::Bottom, Side::Top]);
        assert_relative_eq!(shares[0].area_m2, 6.0);
    }

    #[test]
    fn test_area_conserved_on_grid() {
        let (panels, beams, diags) = run(SpanConfig::new(vec![4.0, 4.0], vec![5.0, 5.0]), &FloorConfig::new("L1", 1));
        let panel_area: f64 = panels.iter().map(|p| p.loaded_area_m2()).sum();
        let beam_area: f64 = beams.iter().flat_map(|b| &b.slices).map(|s| s.area_m2).sum();
        assert_relative_eq!(panel_area, beam_area, epsilon = 1e-9);
        assert!(diags.is_empty());

        // Interior girder A2-B2 gets two triangles
        assert_relative_eq!(beam(&beams, "A2-B2").slices.iter().map(|s| s.area_m2).sum::<f64>(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_deleted_beam_reports_missing_area() {
        let floor = FloorConfig::new("L1", 1).with_deleted_beam("A1-B1");
        let (_, _, diags) = run(SpanConfig::new(vec![4.0], vec![5.0]), &floor);
        let events = diags.into_vec();
        assert!(matches!(
            events[0],
            Diagnostic::PanelUnderAllocated { missing_area_m2, .. } if (missing_area_m2 - 4.0).abs() < 1e-9
        ));
    }

    #[test]
    fn test_crossing_strip() {
        let rect = Rect::new(0.0, 0.0, 4.0, 6.0);
        let beam = CustomBeam::new("CB1", Direction::X, 2.0, 0.0, 2.0);
        let (_, area) = crossing_strip(&rect, &beam).unwrap();
        // overlap 2.0, w1 = min(2, 3) = 2, w2 = min(4, 3) = 3
        assert_relative_eq!(area, 5.0);

        let spanning = CustomBeam::new("CB2", Direction::X, 2.0, 0.0, 4.0);
        assert!(crossing_strip(&rect, &spanning).is_none());
        let on_edge = CustomBeam::new("CB3", Direction::X, 0.0, 0.0, 2.0);
        assert!(crossing_strip(&rect, &on_edge).is_none());
    }

    #[test]
    fn test_cantilever_full_and_halves() {
        let floor =
            FloorConfig::new("L1", 1).with_cantilevers(CantileverConfig::default().with(Side::Bottom, 0, 1.5));
        let (_, beams, diags) = run(SpanConfig::new(vec![4.0, 4.0], vec![5.0, 5.0]), &floor);
        assert!(diags.is_empty());
        let edge = beam(&beams, "A1-B1");
        assert!(edge.slices.iter().any(|s| s.tag == SliceTag::CantileverFull && (s.area_m2 - 6.0).abs() < 1e-9));
        let left = beam(&beams, "CB-A1-bottom");
        let right = beam(&beams, "CB-B1-bottom");
        assert_relative_eq!(left.slices[0].area_m2, 3.0);
        assert_relative_eq!(right.slices[0].area_m2, 3.0);
    }

    #[test]
    fn test_cantilever_edge_beam_deleted() {
        let floor = FloorConfig::new("L1", 1)
            .with_cantilevers(CantileverConfig::default().with(Side::Top, 0, 1.0))
            .with_deleted_beam("A2-B2");
        let (_, _, diags) = run(SpanConfig::new(vec![4.0], vec![5.0]), &floor);
        let events = diags.into_vec();
        assert!(events
            .iter()
            .any(|e| matches!(e, Diagnostic::CantileverWithoutEdgeBeam { edge_beam_id, .. } if edge_beam_id == "A2-B2")));
    }
}
