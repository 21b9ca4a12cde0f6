//! # Load Path Analysis
//!
//! The gravity load path from slab to soil, run as one pure function:
//!
//! ```text
//! BuildingModel
//!   └─ GridBuilder ........ grid coordinates, columns (+ overrides)
//!       └─ per floor, lowest first:
//!            SlabPartitioner ....... panels, one-way / two-way
//!            TributaryDistributor .. panel areas → beams
//!            BeamSolver ............ line loads, end reactions
//!            ColumnAggregator ...... reactions → columns
//!   └─ MemberSizer ........ column and beam sections, capacity checks
//!   └─ FootingSizer ....... tie beam, isolated footings, elevations
//!   └─ MaterialTakeoff .... concrete quantities
//! ```
//!
//! [`analyze`] never fails: bad input is clamped, defaulted, or skipped, and
//! every such decision is recorded in [`Analysis::diagnostics`]. The same
//! model always produces the same analysis.
//!
//! ## Example
//!
//! ```rust
//! use loadpath_core::calculations::analyze;
//! use loadpath_core::model::calibration_model;
//!
//! let analysis = analyze(&calibration_model());
//! let b2 = analysis.column("B2").unwrap();
//! assert!((b2.total_load_kn - 198.4).abs() < 1e-6);
//! ```

pub mod beams;
pub mod columns;
pub mod diagnostics;
pub mod footings;
pub mod grid;
pub mod sizing;
pub mod slabs;
pub mod takeoff;
pub mod tributary;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use beams::{Beam, BeamKind, Support};
pub use columns::{Column, ColumnClass, FloorLoad};
pub use diagnostics::{Diagnostic, Diagnostics, SkipReason};
pub use footings::{Footing, TieBeam};
pub use grid::{Grid, GridIndex};
pub use sizing::{BeamDesign, ColumnCapacity};
pub use slabs::{SlabPanel, SpanType};
pub use takeoff::MaterialTakeoff;
pub use tributary::{SliceTag, TributarySlice};

use crate::loads::FloorLoading;
use crate::model::{BuildingModel, FloorConfig, GroundFloor};

/// Results for one analysed floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorAnalysis {
    pub floor_id: String,
    pub loading: FloorLoading,
    /// q_u = 1.2D + 1.6L (kPa)
    pub factored_pressure_kpa: f64,
    pub panels: Vec<SlabPanel>,
    pub beams: Vec<Beam>,
}

impl FloorAnalysis {
    pub fn panel(&self, id: &str) -> Option<&SlabPanel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn beam(&self, id: &str) -> Option<&Beam> {
        self.beams.iter().find(|b| b.id == id)
    }

    /// Load-carrying slab area of the floor, cantilevers included (m²)
    pub fn loaded_area_m2(&self) -> f64 {
        self.panels.iter().map(|p| p.loaded_area_m2()).sum()
    }

    /// Slab area that reached a beam (m²)
    pub fn assigned_area_m2(&self) -> f64 {
        self.beams
            .iter()
            .flat_map(|b| &b.slices)
            .filter(|s| !matches!(s.tag, SliceTag::CustomStrip | SliceTag::CantileverHalf))
            .map(|s| s.area_m2)
            .sum()
    }
}

/// Complete result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub grid: Grid,
    /// Analysed floors, lowest first
    pub floors: Vec<FloorAnalysis>,
    pub columns: Vec<Column>,
    pub tie_beam: TieBeam,
    pub max_footing_thickness_m: f64,
    pub takeoff: MaterialTakeoff,
    pub diagnostics: Vec<Diagnostic>,
    /// Stale void ids dropped per floor
    pub pruned_void_panels: BTreeMap<String, Vec<String>>,
}

impl Analysis {
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn floor(&self, id: &str) -> Option<&FloorAnalysis> {
        self.floors.iter().find(|f| f.floor_id == id)
    }

    /// Sum of all column loads received from one floor (kN)
    pub fn floor_column_load_kn(&self, floor_id: &str) -> f64 {
        self.columns
            .iter()
            .filter_map(|c| c.floor_load(floor_id))
            .map(|l| l.load_kn)
            .sum()
    }

    /// Total factored load delivered to footings (kN)
    pub fn total_footing_load_kn(&self) -> f64 {
        self.columns
            .iter()
            .filter(|c| c.footing.exists())
            .map(|c| c.footing.factored_load_kn)
            .sum()
    }
}

/// Floors that take part in the load path, lowest first. A slab-on-grade
/// ground floor bears on the soil directly and is left out.
fn analysed_floors<'a>(model: &'a BuildingModel, diagnostics: &mut Diagnostics) -> Vec<&'a FloorConfig> {
    let mut floors = model.ordered_floors();
    if model.settings.ground_floor == GroundFloor::SlabOnGrade && !floors.is_empty() {
        let ground = floors.remove(0);
        diagnostics.push(Diagnostic::FloorExcluded {
            floor_id: ground.id.clone(),
        });
    }
    floors
}

/// Run the full load path for a building model.
pub fn analyze(model: &BuildingModel) -> Analysis {
    let mut diagnostics = Diagnostics::new();

    let grid = Grid::from_spans(&model.spans, &mut diagnostics);
    let mut columns = grid::build_columns(&grid, model, &mut diagnostics);
    let lookup = grid::ColumnLookup::new(&columns);

    let mut floors = Vec::new();
    let mut pruned_void_panels = BTreeMap::new();

    for floor in analysed_floors(model, &mut diagnostics) {
        let loading = FloorLoading::for_floor(floor, &model.settings);
        let q_u = loading.factored_pressure_kpa();

        let partition = slabs::partition_floor(&grid, floor, &mut diagnostics);
        if !partition.pruned_voids.is_empty() {
            pruned_void_panels.insert(floor.id.clone(), partition.pruned_voids.clone());
        }

        let mut floor_beams = beams::generate_beams(&grid, floor, &columns, &partition.panels, &mut diagnostics);
        tributary::distribute_floor(floor, &partition.panels, &mut floor_beams, &mut diagnostics);
        beams::solve_beams(&mut floor_beams, floor, &model.settings, q_u);
        columns::aggregate_floor(floor, model, &floor_beams, &mut columns, &lookup, &mut diagnostics);

        floors.push(FloorAnalysis {
            floor_id: floor.id.clone(),
            loading,
            factored_pressure_kpa: q_u,
            panels: partition.panels,
            beams: floor_beams,
        });
    }

    sizing::size_columns(&mut columns, model);
    for floor in floors.iter_mut() {
        sizing::size_beams(&mut floor.beams, &model.settings);
    }

    let tie_beam = footings::size_tie_beam(&grid, &model.settings);
    let max_footing_thickness_m = footings::size_footings(&mut columns, &tie_beam, &model.settings);
    let takeoff = MaterialTakeoff::compute(&grid, &floors, &columns, &tie_beam, model);

    tracing::info!(
        floors = floors.len(),
        columns = columns.len(),
        diagnostics = diagnostics.len(),
        "analysis complete"
    );

    Analysis {
        grid,
        floors,
        columns,
        tie_beam,
        max_footing_thickness_m,
        takeoff,
        diagnostics: diagnostics.into_vec(),
        pruned_void_panels,
    }
}
