//! # Column Aggregator
//!
//! Collects beam end reactions into the supporting columns floor by floor.
//! A column accumulates one [`FloorLoad`] per analysed floor; its total is
//! the sum of those entries.
//!
//! A column is skipped on a floor when it is deactivated globally, when it is
//! deactivated on that floor, or when it is a planted column whose start
//! floor lies above. Beams framing into a skipped column lose that reaction;
//! the dropped amount is reported in a [`Diagnostic::ColumnSkipped`] event.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::beams::Beam;
use super::diagnostics::{Diagnostic, Diagnostics, SkipReason};
use super::footings::Footing;
use super::grid::{ColumnLookup, GridIndex};
use super::sizing::ColumnCapacity;
use crate::geometry::Point;
use crate::model::{BuildingModel, ColumnFloorOverride, ColumnOverride, FloorConfig, RectSection};

/// Plan location class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnClass {
    Corner,
    Edge,
    Interior,
}

impl ColumnClass {
    /// Class from whether the column sits on an X-boundary and/or a Y-boundary line
    pub fn from_boundaries(on_x: bool, on_y: bool) -> Self {
        match (on_x, on_y) {
            (true, true) => ColumnClass::Corner,
            (true, false) | (false, true) => ColumnClass::Edge,
            (false, false) => ColumnClass::Interior,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnClass::Corner => "corner",
            ColumnClass::Edge => "edge",
            ColumnClass::Interior => "interior",
        }
    }
}

/// Load a column receives from one floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorLoad {
    pub floor_id: String,
    /// Factored load (kN); zero when skipped
    pub load_kn: f64,
    pub skipped: Option<SkipReason>,
}

/// A column with its accumulated loads and design results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub position: Point,
    /// `None` for planted (off-grid) columns
    pub grid_index: Option<GridIndex>,
    pub class: ColumnClass,

    pub active: bool,
    /// Floor id the column starts on; set for planted columns
    pub start_floor: Option<String>,
    /// Column-specific fixed section
    pub section_override: Option<RectSection>,
    pub floor_overrides: BTreeMap<String, ColumnFloorOverride>,

    /// One entry per analysed floor, lowest first
    pub floor_loads: Vec<FloorLoad>,
    /// Factored axial load from all floors (kN)
    pub total_load_kn: f64,

    /// Governing section from the member sizer
    pub section: Option<RectSection>,
    pub reinforcement_ratio: f64,
    /// Unfactored column self-weight over the floors it is present on (kN)
    pub self_weight_kn: f64,
    pub capacity: Option<ColumnCapacity>,
    pub footing: Footing,
}

impl Column {
    pub fn new(id: impl Into<String>, position: Point, grid_index: Option<GridIndex>, class: ColumnClass) -> Self {
        Column {
            id: id.into(),
            position,
            grid_index,
            class,
            active: true,
            start_floor: None,
            section_override: None,
            floor_overrides: BTreeMap::new(),
            floor_loads: Vec::new(),
            total_load_kn: 0.0,
            section: None,
            reinforcement_ratio: 0.0,
            self_weight_kn: 0.0,
            capacity: None,
            footing: Footing::default(),
        }
    }

    /// Merge persistent override data onto a freshly generated column
    pub fn apply_override(&mut self, overrides: &ColumnOverride) {
        if let Some(active) = overrides.active {
            self.active = active;
        }
        if overrides.start_floor.is_some() {
            self.start_floor = overrides.start_floor.clone();
        }
        self.section_override = overrides.section.filter(RectSection::is_valid);
        self.floor_overrides = overrides.floors.clone();
    }

    /// Starts on an upper floor instead of running down to a footing
    pub fn is_planted(&self) -> bool {
        self.start_floor.is_some()
    }

    /// Carries its load down to a footing
    pub fn is_grounded(&self) -> bool {
        self.active && !self.is_planted()
    }

    /// Why this column takes no load on `floor`, if it is skipped there
    pub fn skip_reason(&self, floor: &FloorConfig, model: &BuildingModel) -> Option<SkipReason> {
        if !self.active {
            return Some(SkipReason::Inactive);
        }
        if self.floor_overrides.get(&floor.id).and_then(|o| o.active) == Some(false) {
            return Some(SkipReason::InactiveOnFloor);
        }
        let start = self.start_floor.as_deref().and_then(|id| model.floor(id))?;
        if floor.position < start.position {
            Some(SkipReason::BelowStartFloor)
        } else {
            None
        }
    }

    /// Section of the storey below `floor_id`: the floor override, else the
    /// governing section
    pub fn section_on(&self, floor_id: &str) -> Option<RectSection> {
        self.floor_overrides
            .get(floor_id)
            .and_then(|o| o.section)
            .filter(RectSection::is_valid)
            .or(self.section)
    }

    pub fn floor_load(&self, floor_id: &str) -> Option<&FloorLoad> {
        self.floor_loads.iter().find(|l| l.floor_id == floor_id)
    }

    /// Floors on which the column physically exists
    pub fn present_floors(&self) -> impl Iterator<Item = &FloorLoad> {
        self.floor_loads.iter().filter(|l| l.skipped.is_none())
    }

    fn record(&mut self, floor_id: &str, load_kn: f64, skipped: Option<SkipReason>) {
        self.total_load_kn += load_kn;
        self.floor_loads.push(FloorLoad {
            floor_id: floor_id.to_string(),
            load_kn,
            skipped,
        });
    }
}

/// Deliver one floor's beam reactions to the columns.
pub fn aggregate_floor(
    floor: &FloorConfig,
    model: &BuildingModel,
    beams: &[Beam],
    columns: &mut [Column],
    lookup: &ColumnLookup,
    diagnostics: &mut Diagnostics,
) {
    let mut received = vec![0.0; columns.len()];

    for beam in beams {
        for (end, support) in beam.kind.supports().iter().enumerate() {
            let load = beam.column_load_kn(end);
            if load <= 0.0 {
                continue;
            }
            match lookup.resolve(support) {
                Some(slot) => received[slot] += load,
                None => diagnostics.push(Diagnostic::UnsupportedReaction {
                    floor_id: floor.id.clone(),
                    beam_id: beam.id.clone(),
                    load_kn: load,
                }),
            }
        }
    }

    for (column, load) in columns.iter_mut().zip(received) {
        match column.skip_reason(floor, model) {
            Some(reason) => {
                diagnostics.push(Diagnostic::ColumnSkipped {
                    floor_id: floor.id.clone(),
                    column_id: column.id.clone(),
                    reason,
                    dropped_load_kn: load,
                });
                column.record(&floor.id, 0.0, Some(reason));
            }
            None => column.record(&floor.id, load, None),
        }
    }

    tracing::debug!(floor = %floor.id, "column loads aggregated");
}
