//! # Beams
//!
//! Beam generation for one floor and the beam solver that turns assigned
//! tributary area into a line load and two end reactions.
//!
//! Beams come in four kinds. Everything that differs between kinds (wall
//! load, reaction split, supports, span/depth ratio) is answered by
//! [`BeamKind`] in one place:
//!
//! | Kind         | Source                              | Wall load | Reactions       |
//! |--------------|-------------------------------------|-----------|-----------------|
//! | `Standard`   | grid line between two intersections | yes       | half per end    |
//! | `Edge`       | perimeter grid beam with a cantilever | no      | half per end    |
//! | `Cantilever` | projects from a perimeter column    | no        | all at the root |
//! | `Custom`     | user-placed intermediate beam       | no        | half per end    |
//!
//! ## Beam Formulas
//!
//! ```text
//! w      = q_u × A_trib / L  (+ 1.2 × wall for standard beams)   [kN/m]
//! R_end  = w × L / 2   (cantilever: R_root = w × L)              [kN]
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::columns::Column;
use super::diagnostics::{Diagnostic, Diagnostics};
use super::grid::{column_id, grid_beam_id, Grid, GridIndex};
use super::sizing::BeamDesign;
use super::slabs::SlabPanel;
use super::tributary::TributarySlice;
use crate::geometry::{Direction, Point, Segment, Side};
use crate::loads::{factored_wall_load, non_negative, DEAD_LOAD_FACTOR};
use crate::model::{DesignSettings, FloorConfig, RectSection};

/// What a beam end bears on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Support {
    /// Grid column at an intersection
    Grid(GridIndex),
    /// Column by id (grid or planted)
    Column(String),
    /// Free end; any reaction here has nowhere to go
    Free,
}

/// Beam kind with the data each kind needs to resolve its supports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BeamKind {
    Standard { start: GridIndex, end: GridIndex },
    Edge { start: GridIndex, end: GridIndex },
    Cantilever { root: GridIndex, side: Side },
    Custom {
        start_column: Option<String>,
        end_column: Option<String>,
    },
}

impl BeamKind {
    pub fn name(&self) -> &'static str {
        match self {
            BeamKind::Standard { .. } => "standard",
            BeamKind::Edge { .. } => "edge",
            BeamKind::Cantilever { .. } => "cantilever",
            BeamKind::Custom { .. } => "custom",
        }
    }

    pub fn is_cantilever(&self) -> bool {
        matches!(self, BeamKind::Cantilever { .. })
    }

    /// Only standard grid beams carry the floor's wall line load
    pub fn carries_wall_load(&self) -> bool {
        matches!(self, BeamKind::Standard { .. })
    }

    /// Supports at the start and end of the beam
    pub fn supports(&self) -> [Support; 2] {
        match self {
            BeamKind::Standard { start, end } | BeamKind::Edge { start, end } => {
                [Support::Grid(*start), Support::Grid(*end)]
            }
            BeamKind::Cantilever { root, .. } => [Support::Grid(*root), Support::Free],
            BeamKind::Custom { start_column, end_column } => [
                start_column.clone().map_or(Support::Free, Support::Column),
                end_column.clone().map_or(Support::Free, Support::Column),
            ],
        }
    }

    /// Fraction of a beam load taken at each end
    pub fn end_fractions(&self) -> [f64; 2] {
        match self {
            BeamKind::Cantilever { .. } => [1.0, 0.0],
            _ => [0.5, 0.5],
        }
    }

    /// Span/depth ratio used for preliminary depth
    pub fn span_depth_ratio(&self) -> f64 {
        if self.is_cantilever() {
            8.0
        } else {
            16.0
        }
    }
}

/// A beam on one floor with its solved loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub id: String,
    pub direction: Direction,
    pub start: Point,
    pub end: Point,
    pub span_m: f64,
    pub kind: BeamKind,

    /// Slab pieces assigned to this beam
    pub slices: Vec<TributarySlice>,
    pub tributary_area_m2: f64,
    /// Equivalent tributary width A_trib / L (m)
    pub tributary_width_m: f64,
    /// Factored line load (kN/m)
    pub line_load_kn_per_m: f64,
    /// Factored end reactions from the line load `[start, end]` (kN)
    pub reactions_kn: [f64; 2],
    /// Factored self-weight delivered to columns (kN); zero unless a fixed
    /// beam section is configured
    pub self_weight_kn: f64,

    /// Section from the member sizer
    pub section: Option<RectSection>,
    pub design: Option<BeamDesign>,
}

impl Beam {
    pub fn new(id: impl Into<String>, start: Point, end: Point, kind: BeamKind) -> Self {
        let segment = Segment::new(start, end);
        Beam {
            id: id.into(),
            direction: segment.direction().unwrap_or(Direction::X),
            start,
            end,
            span_m: segment.length(),
            kind,
            slices: Vec::new(),
            tributary_area_m2: 0.0,
            tributary_width_m: 0.0,
            line_load_kn_per_m: 0.0,
            reactions_kn: [0.0, 0.0],
            self_weight_kn: 0.0,
            section: None,
            design: None,
        }
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }

    pub fn add_slice(&mut self, slice: TributarySlice) {
        self.slices.push(slice);
    }

    /// Total factored load this beam hands to the column at one end (kN)
    pub fn column_load_kn(&self, end: usize) -> f64 {
        self.reactions_kn[end] + self.self_weight_kn * self.kind.end_fractions()[end]
    }

    /// Solve line load and reactions from the assigned slices
    pub fn solve(&mut self, factored_pressure_kpa: f64, factored_wall_kn_per_m: f64, self_weight_kn: f64) {
        self.tributary_area_m2 = self.slices.iter().map(|s| s.area_m2).sum();
        self.tributary_width_m = if self.span_m > 0.0 {
            self.tributary_area_m2 / self.span_m
        } else {
            0.0
        };
        let wall = if self.kind.carries_wall_load() {
            factored_wall_kn_per_m
        } else {
            0.0
        };
        self.line_load_kn_per_m = factored_pressure_kpa * self.tributary_width_m + wall;
        let total = self.line_load_kn_per_m * self.span_m;
        let fractions = self.kind.end_fractions();
        self.reactions_kn = [total * fractions[0], total * fractions[1]];
        self.self_weight_kn = self_weight_kn;
    }
}

/// Generate every beam of one floor.
///
/// Order: X grid beams (row by row), Y grid beams (column by column),
/// cantilever beams by edge, then custom beams in floor order.
pub fn generate_beams(
    grid: &Grid,
    floor: &FloorConfig,
    columns: &[Column],
    panels: &[SlabPanel],
    diagnostics: &mut Diagnostics,
) -> Vec<Beam> {
    let edge_ids: BTreeSet<&str> = panels
        .iter()
        .filter_map(|p| p.cantilever.as_ref())
        .map(|c| c.edge_beam_id.as_str())
        .collect();

    let mut beams = Vec::new();
    let push_grid_beam = |a: GridIndex, b: GridIndex, beams: &mut Vec<Beam>| {
        let id = grid_beam_id(a, b);
        if floor.deleted_beams.contains(&id) {
            return;
        }
        let kind = if edge_ids.contains(id.as_str()) {
            BeamKind::Edge { start: a, end: b }
        } else {
            BeamKind::Standard { start: a, end: b }
        };
        beams.push(Beam::new(id, grid.point(a), grid.point(b), kind));
    };

    for j in 0..grid.ys.len() {
        for i in 0..grid.nx_bays() {
            push_grid_beam(GridIndex::new(i, j), GridIndex::new(i + 1, j), &mut beams);
        }
    }
    for i in 0..grid.xs.len() {
        for j in 0..grid.ny_bays() {
            push_grid_beam(GridIndex::new(i, j), GridIndex::new(i, j + 1), &mut beams);
        }
    }

    for side in Side::ALL {
        let bays = grid.side_bays(side);
        for k in 0..=bays {
            let before = if k > 0 { floor.cantilevers.length(side, k - 1) } else { 0.0 };
            let after = if k < bays { floor.cantilevers.length(side, k) } else { 0.0 };
            let length = before.max(after);
            if length <= 0.0 {
                continue;
            }
            let root = grid.edge_node(side, k);
            let id = format!("CB-{}-{}", column_id(root), side.name());
            if floor.deleted_beams.contains(&id) {
                continue;
            }
            let start = grid.point(root);
            let (ux, uy) = Grid::outward(side);
            let tip = Point::new(start.x + ux * length, start.y + uy * length);
            beams.push(Beam::new(id, start, tip, BeamKind::Cantilever { root, side }));
        }
    }

    for custom in &floor.custom_beams {
        if !custom.is_valid() {
            diagnostics.push(Diagnostic::CustomBeamIgnored {
                floor_id: floor.id.clone(),
                beam_id: custom.id.clone(),
            });
            continue;
        }
        if floor.deleted_beams.contains(&custom.id) {
            continue;
        }
        let segment = custom.segment();
        let column_at = |p: &Point| columns.iter().find(|c| c.position.coincides(p)).map(|c| c.id.clone());
        let kind = BeamKind::Custom {
            start_column: column_at(&segment.start),
            end_column: column_at(&segment.end),
        };
        beams.push(Beam::new(custom.id.clone(), segment.start, segment.end, kind));
    }

    beams
}

/// Solve every beam of a floor: line loads, reactions and, when a fixed beam
/// section is configured, the factored self-weight passed to the columns.
pub fn solve_beams(beams: &mut [Beam], floor: &FloorConfig, settings: &DesignSettings, factored_pressure_kpa: f64) {
    let wall = factored_wall_load(floor.wall_load_kn_per_m);
    let density = non_negative(settings.concrete_density_kn_m3);
    let fixed = settings.fixed_beam_section();
    for beam in beams.iter_mut() {
        let self_weight = fixed.map_or(0.0, |s| DEAD_LOAD_FACTOR * density * s.area_m2() * beam.span_m);
        beam.solve(factored_pressure_kpa, wall, self_weight);
    }
    tracing::debug!(floor = %floor.id, beams = beams.len(), q_u = factored_pressure_kpa, "beams solved");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::grid::build_columns;
    use crate::calculations::slabs::partition_floor;
    use crate::calculations::tributary::{SliceTag, TributarySlice};
    use crate::geometry::Polygon;
    use crate::model::{BuildingModel, CantileverConfig, CustomBeam, SpanConfig};
    use approx::assert_relative_eq;

    fn setup(floor: &FloorConfig) -> Vec<Beam> {
        let model = BuildingModel::new(SpanConfig::new(vec![4.0, 4.0], vec![5.0, 5.0]));
        let mut diags = Diagnostics::new();
        let grid = Grid::from_spans(&model.spans, &mut diags);
        let columns = build_columns(&grid, &model, &mut diags);
        let part = partition_floor(&grid, floor, &mut diags);
        generate_beams(&grid, floor, &columns, &part.panels, &mut diags)
    }

    fn slice(area: f64) -> TributarySlice {
        TributarySlice {
            panel_id: "S1-1".into(),
            side: None,
            tag: SliceTag::OneWayHalf,
            polygon: Polygon::default(),
            area_m2: area,
        }
    }

    #[test]
    fn test_grid_beam_count_and_ids() {
        let beams = setup(&FloorConfig::new("L1", 1));
        assert_eq!(beams.len(), 12);
        assert_eq!(beams[0].id, "A1-B1");
        assert!(beams.iter().any(|b| b.id == "B2-B3"));
        assert!(beams.iter().all(|b| matches!(b.kind, BeamKind::Standard { .. })));
    }

    #[test]
    fn test_deleted_beam_omitted() {
        let beams = setup(&FloorConfig::new("L1", 1).with_deleted_beam("A1-B1"));
        assert_eq!(beams.len(), 11);
        assert!(beams.iter().all(|b| b.id != "A1-B1"));
    }

    #[test]
    fn test_cantilever_generates_edge_and_bracket_beams() {
        let floor =
            FloorConfig::new("L1", 1).with_cantilevers(CantileverConfig::default().with(Side::Bottom, 0, 1.5));
        let beams = setup(&floor);
        let edge = beams.iter().find(|b| b.id == "A1-B1").unwrap();
        assert_eq!(edge.kind.name(), "edge");
        let brackets: Vec<&Beam> = beams.iter().filter(|b| b.kind.is_cantilever()).collect();
        assert_eq!(brackets.len(), 2);
        assert_eq!(brackets[0].id, "CB-A1-bottom");
        assert_relative_eq!(brackets[0].span_m, 1.5);
        assert_relative_eq!(brackets[1].end.y, -1.5);
    }

    #[test]
    fn test_custom_beam_supports_resolved() {
        let floor = FloorConfig::new("L1", 1)
            .with_custom_beam(CustomBeam::new("CB1", Direction::Y, 2.0, 0.0, 3.0))
            .with_custom_beam(CustomBeam::new("CB2", Direction::X, 5.0, 4.0, 4.0));
        let beams = setup(&floor);
        let cb1 = beams.iter().find(|b| b.id == "CB1").unwrap();
        assert_eq!(cb1.kind.supports(), [Support::Free, Support::Free]);
        assert!(beams.iter().all(|b| b.id != "CB2"));

        let floor = FloorConfig::new("L1", 1).with_custom_beam(CustomBeam::new("CB3", Direction::X, 5.0, 0.0, 8.0));
        let beams = setup(&floor);
        let cb3 = beams.iter().find(|b| b.id == "CB3").unwrap();
        assert_eq!(
            cb3.kind.supports(),
            [Support::Column("A2".into()), Support::Column("C2".into())]
        );
    }

    #[test]
    fn test_solve_standard_beam_with_wall() {
        let mut beam = Beam::new(
            "A1-B1",
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            BeamKind::Standard {
                start: GridIndex::new(0, 0),
                end: GridIndex::new(1, 0),
            },
        );
        beam.add_slice(slice(4.0));
        beam.solve(10.0, 6.0, 0.0);
        assert_relative_eq!(beam.tributary_width_m, 1.0);
        assert_relative_eq!(beam.line_load_kn_per_m, 16.0);
        assert_relative_eq!(beam.reactions_kn[0], 32.0);
        assert_relative_eq!(beam.column_load_kn(1), 32.0);
    }

    #[test]
    fn test_cantilever_beam_delivers_root_reaction() {
        let mut beam = Beam::new(
            "CB-A1-bottom",
            Point::new(0.0, 0.0),
            Point::new(0.0, -2.0),
            BeamKind::Cantilever {
                root: GridIndex::new(0, 0),
                side: Side::Bottom,
            },
        );
        beam.add_slice(slice(2.0));
        beam.solve(10.0, 6.0, 3.0);
        assert_relative_eq!(beam.line_load_kn_per_m, 10.0);
        assert_relative_eq!(beam.reactions_kn[0], 20.0);
        assert_relative_eq!(beam.reactions_kn[1], 0.0);
        // w·L plus the whole self-weight at the root
        assert_relative_eq!(beam.column_load_kn(0), 23.0);
        assert_relative_eq!(beam.column_load_kn(1), 0.0);
    }

    #[test]
    fn test_fixed_section_self_weight() {
        let mut beams = setup(&FloorConfig::new("L1", 1));
        let settings = DesignSettings {
            beam_section: Some(RectSection::new(250.0, 500.0)),
            ..Default::default()
        };
        solve_beams(&mut beams, &FloorConfig::new("L1", 1), &settings, 9.92);
        // 1.2 × 24 × 0.125 × 4.0
        assert_relative_eq!(beams[0].self_weight_kn, 14.4, epsilon = 1e-9);
        assert_relative_eq!(beams[0].column_load_kn(0), 7.2, epsilon = 1e-9);
    }
}
