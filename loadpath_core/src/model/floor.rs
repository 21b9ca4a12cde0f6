//! Per-floor configuration: geometry-independent loads plus the members and
//! openings the user has placed on that floor.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geometry::{Direction, Point, Segment, Side};

/// Configuration of one suspended floor
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "L2",
///   "position": 2,
///   "height_m": 3.0,
///   "slab_thickness_mm": 150.0,
///   "superimposed_dead_kpa": 2.0,
///   "live_kpa": 2.0,
///   "wall_load_kn_per_m": 0.0,
///   "cantilevers": { "bottom": [1.5, 0.0] },
///   "void_panels": ["S1-1"],
///   "deleted_beams": ["B2-C2"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorConfig {
    /// Stable floor id (e.g., "L1", "Roof")
    pub id: String,

    /// Ordering key, lowest floor first
    pub position: i32,

    /// Storey height below this floor (m)
    #[serde(default = "default_height")]
    pub height_m: f64,

    #[serde(default = "default_slab_thickness")]
    pub slab_thickness_mm: f64,

    #[serde(default = "default_area_load")]
    pub superimposed_dead_kpa: f64,

    #[serde(default = "default_area_load")]
    pub live_kpa: f64,

    /// Service wall line load on standard beams (kN/m)
    #[serde(default)]
    pub wall_load_kn_per_m: f64,

    /// Cantilever lengths for this floor only; absent means none
    #[serde(default)]
    pub cantilevers: CantileverConfig,

    #[serde(default)]
    pub custom_beams: Vec<CustomBeam>,

    /// Panel ids treated as openings
    #[serde(default)]
    pub void_panels: BTreeSet<String>,

    /// Grid beam ids removed by the user
    #[serde(default)]
    pub deleted_beams: BTreeSet<String>,
}

fn default_height() -> f64 {
    3.0
}

fn default_slab_thickness() -> f64 {
    150.0
}

fn default_area_load() -> f64 {
    2.0
}

impl FloorConfig {
    /// New floor with typical residential defaults: 3.0 m storey,
    /// 150 mm slab, 2.0 kPa superimposed dead, 2.0 kPa live, no walls.
    pub fn new(id: impl Into<String>, position: i32) -> Self {
        FloorConfig {
            id: id.into(),
            position,
            height_m: default_height(),
            slab_thickness_mm: default_slab_thickness(),
            superimposed_dead_kpa: default_area_load(),
            live_kpa: default_area_load(),
            wall_load_kn_per_m: 0.0,
            cantilevers: CantileverConfig::default(),
            custom_beams: Vec::new(),
            void_panels: BTreeSet::new(),
            deleted_beams: BTreeSet::new(),
        }
    }

    pub fn with_height(mut self, height_m: f64) -> Self {
        self.height_m = height_m;
        self
    }

    pub fn with_slab_thickness(mut self, thickness_mm: f64) -> Self {
        self.slab_thickness_mm = thickness_mm;
        self
    }

    pub fn with_loads(mut self, superimposed_dead_kpa: f64, live_kpa: f64) -> Self {
        self.superimposed_dead_kpa = superimposed_dead_kpa;
        self.live_kpa = live_kpa;
        self
    }

    pub fn with_wall_load(mut self, wall_load_kn_per_m: f64) -> Self {
        self.wall_load_kn_per_m = wall_load_kn_per_m;
        self
    }

    pub fn with_cantilevers(mut self, cantilevers: CantileverConfig) -> Self {
        self.cantilevers = cantilevers;
        self
    }

    pub fn with_custom_beam(mut self, beam: CustomBeam) -> Self {
        self.custom_beams.push(beam);
        self
    }

    pub fn with_void(mut self, panel_id: impl Into<String>) -> Self {
        self.void_panels.insert(panel_id.into());
        self
    }

    pub fn with_deleted_beam(mut self, beam_id: impl Into<String>) -> Self {
        self.deleted_beams.insert(beam_id.into());
        self
    }

    /// Height used for column self-weight; non-positive heights count as zero
    pub fn effective_height_m(&self) -> f64 {
        if self.height_m.is_finite() && self.height_m > 0.0 {
            self.height_m
        } else {
            0.0
        }
    }
}

/// Cantilever lengths per grid edge, one entry per bay along that edge (m)
///
/// `bottom`/`top` are indexed by X bay, `left`/`right` by Y bay. Missing,
/// negative, or non-finite entries mean "no cantilever".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CantileverConfig {
    #[serde(default)]
    pub top: Vec<f64>,
    #[serde(default)]
    pub bottom: Vec<f64>,
    #[serde(default)]
    pub left: Vec<f64>,
    #[serde(default)]
    pub right: Vec<f64>,
}

impl CantileverConfig {
    /// Set the length of one bay's cantilever (builder pattern)
    pub fn with(mut self, side: Side, bay: usize, length_m: f64) -> Self {
        let lengths = self.lengths_mut(side);
        if lengths.len() <= bay {
            lengths.resize(bay + 1, 0.0);
        }
        lengths[bay] = length_m;
        self
    }

    fn lengths_mut(&mut self, side: Side) -> &mut Vec<f64> {
        match side {
            Side::Top => &mut self.top,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    fn lengths(&self, side: Side) -> &[f64] {
        match side {
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Cantilever length for a bay, 0.0 when not configured
    pub fn length(&self, side: Side, bay: usize) -> f64 {
        self.lengths(side)
            .get(bay)
            .copied()
            .filter(|l| l.is_finite() && *l > 0.0)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        Side::ALL
            .iter()
            .all(|side| self.lengths(*side).iter().all(|l| !(l.is_finite() && *l > 0.0)))
    }
}

/// A user-placed intermediate beam
///
/// An X-direction beam at `offset = 2.5` from `start = 0.0` to `end = 4.0`
/// runs along y = 2.5 between x = 0 and x = 4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBeam {
    pub id: String,
    pub direction: Direction,
    /// Absolute coordinate on the perpendicular axis (m)
    pub offset: f64,
    /// Absolute start coordinate along the beam's own axis (m)
    pub start: f64,
    /// Absolute end coordinate along the beam's own axis (m)
    pub end: f64,
}

impl CustomBeam {
    pub fn new(id: impl Into<String>, direction: Direction, offset: f64, start: f64, end: f64) -> Self {
        CustomBeam {
            id: id.into(),
            direction,
            offset,
            start,
            end,
        }
    }

    /// Extent along the beam's own axis as `(min, max)`
    pub fn extent(&self) -> (f64, f64) {
        (self.start.min(self.end), self.start.max(self.end))
    }

    pub fn segment(&self) -> Segment {
        let (a, b) = self.extent();
        match self.direction {
            Direction::X => Segment::new(Point::new(a, self.offset), Point::new(b, self.offset)),
            Direction::Y => Segment::new(Point::new(self.offset, a), Point::new(self.offset, b)),
        }
    }

    /// False for zero-length or non-finite beams, which the pipeline ignores
    pub fn is_valid(&self) -> bool {
        let (a, b) = self.extent();
        self.offset.is_finite() && a.is_finite() && b.is_finite() && b - a > crate::geometry::GEOMETRY_TOLERANCE_M
    }
}
