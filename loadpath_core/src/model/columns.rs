//! Persistent column override data.
//!
//! Columns themselves are regenerated from the spans on every run. What the
//! user sets on a column (activation, planted start floor, section, per-floor
//! flags) is stored here, keyed by the column's stable id, and merged onto the
//! freshly generated columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RectSection;
use crate::geometry::Point;

/// User overrides for one column, keyed by column id in the model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOverride {
    /// Global activation; `Some(false)` removes the column from every floor
    pub active: Option<bool>,

    /// Floor id the column starts on; a value marks the column as planted
    pub start_floor: Option<String>,

    /// Fixed section for this column (overrides the global fixed section)
    pub section: Option<RectSection>,

    /// Per-floor overrides keyed by floor id
    pub floors: BTreeMap<String, ColumnFloorOverride>,
}

impl ColumnOverride {
    /// True when no field carries data (the entry can be dropped)
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
            && self.start_floor.is_none()
            && self.section.is_none()
            && self.floors.values().all(ColumnFloorOverride::is_empty)
    }
}

/// Override applying to one column on one floor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFloorOverride {
    /// `Some(false)` removes the column from this floor only
    pub active: Option<bool>,

    /// Section of the column in the storey below this floor
    pub section: Option<RectSection>,
}

impl ColumnFloorOverride {
    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.section.is_none()
    }
}

/// A column placed off the grid (typically on a beam)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantedColumn {
    pub id: String,
    pub position: Point,
    /// Floor id the column starts on; `None` runs it down to a footing
    #[serde(default)]
    pub start_floor: Option<String>,
}

impl PlantedColumn {
    pub fn new(id: impl Into<String>, x: f64, y: f64, start_floor: Option<String>) -> Self {
        PlantedColumn {
            id: id.into(),
            position: Point::new(x, y),
            start_floor,
        }
    }
}
