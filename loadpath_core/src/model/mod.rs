//! # Building Model (analysis input)
//!
//! The immutable input record handed to [`crate::calculations::analyze`].
//! Everything the user edits lives here: spans, floors, design settings, and
//! the persistent column override map. Derived entities (columns, beams,
//! slabs, footings) are never stored in the model; they are regenerated on
//! every analysis run and the override data is merged in by stable id.
//!
//! ## Structure
//!
//! ```text
//! BuildingModel
//! ├── spans: SpanConfig (X and Y bay lengths)
//! ├── floors: Vec<FloorConfig> (ordered by `position`)
//! ├── settings: DesignSettings (materials, soil, fixed sections)
//! ├── column_overrides: BTreeMap<column id, ColumnOverride>
//! └── planted_columns: Vec<PlantedColumn> (off-grid columns)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use loadpath_core::model::{BuildingModel, FloorConfig, SpanConfig};
//!
//! let model = BuildingModel::new(SpanConfig::new(vec![4.0, 4.0], vec![5.0, 5.0]))
//!     .with_floor(FloorConfig::new("L1", 1))
//!     .with_floor(FloorConfig::new("L2", 2));
//!
//! let json = serde_json::to_string_pretty(&model).unwrap();
//! assert!(json.contains("\"L2\""));
//! ```

pub mod columns;
pub mod floor;
pub mod settings;

pub use columns::{ColumnFloorOverride, ColumnOverride, PlantedColumn};
pub use floor::{CantileverConfig, CustomBeam, FloorConfig};
pub use settings::{DesignSettings, GroundFloor, RectSection};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Direction;

/// Span used in place of any non-positive or non-finite span (m)
pub const DEFAULT_SPAN_M: f64 = 4.0;

/// Ordered bay lengths in each plan direction (m)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanConfig {
    /// Bay lengths left to right
    pub x: Vec<f64>,
    /// Bay lengths bottom to top
    pub y: Vec<f64>,
}

/// A span value that was replaced during sanitizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampedSpan {
    pub direction: Direction,
    pub index: usize,
    pub value: f64,
    pub replacement: f64,
}

impl SpanConfig {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        SpanConfig { x, y }
    }

    /// Replace non-positive spans with [`DEFAULT_SPAN_M`]; an empty sequence
    /// becomes a single default bay. Never fails.
    pub fn sanitized(&self) -> (SpanConfig, Vec<ClampedSpan>) {
        let mut clamped = Vec::new();
        let mut clean = |spans: &[f64], direction: Direction| -> Vec<f64> {
            if spans.is_empty() {
                clamped.push(ClampedSpan {
                    direction,
                    index: 0,
                    value: 0.0,
                    replacement: DEFAULT_SPAN_M,
                });
                return vec![DEFAULT_SPAN_M];
            }
            spans
                .iter()
                .enumerate()
                .map(|(index, &value)| {
                    if value.is_finite() && value > 0.0 {
                        value
                    } else {
                        clamped.push(ClampedSpan {
                            direction,
                            index,
                            value,
                            replacement: DEFAULT_SPAN_M,
                        });
                        DEFAULT_SPAN_M
                    }
                })
                .collect()
        };
        let x = clean(&self.x, Direction::X);
        let y = clean(&self.y, Direction::Y);
        (SpanConfig { x, y }, clamped)
    }

    pub fn total_x(&self) -> f64 {
        self.x.iter().sum()
    }

    pub fn total_y(&self) -> f64 {
        self.y.iter().sum()
    }
}

impl Default for SpanConfig {
    fn default() -> Self {
        SpanConfig::new(vec![4.0, 4.0], vec![5.0, 5.0])
    }
}

/// Root input record for one building
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildingModel {
    pub spans: SpanConfig,

    #[serde(default)]
    pub floors: Vec<FloorConfig>,

    #[serde(default)]
    pub settings: DesignSettings,

    /// Persistent per-column overrides keyed by stable column id
    #[serde(default)]
    pub column_overrides: BTreeMap<String, ColumnOverride>,

    /// Off-grid columns, matched across regenerations by position
    #[serde(default)]
    pub planted_columns: Vec<PlantedColumn>,
}

impl BuildingModel {
    pub fn new(spans: SpanConfig) -> Self {
        BuildingModel {
            spans,
            ..Default::default()
        }
    }

    /// Add a floor (builder pattern)
    pub fn with_floor(mut self, floor: FloorConfig) -> Self {
        self.floors.push(floor);
        self
    }

    /// Replace the design settings (builder pattern)
    pub fn with_settings(mut self, settings: DesignSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn floor(&self, id: &str) -> Option<&FloorConfig> {
        self.floors.iter().find(|f| f.id == id)
    }

    pub fn floor_mut(&mut self, id: &str) -> Option<&mut FloorConfig> {
        self.floors.iter_mut().find(|f| f.id == id)
    }

    /// Floors sorted lowest first; ties broken by id so the order is stable
    pub fn ordered_floors(&self) -> Vec<&FloorConfig> {
        let mut floors: Vec<&FloorConfig> = self.floors.iter().collect();
        floors.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        floors
    }

    /// Mutable access to the override entry for a column, creating it if absent
    pub fn column_override_mut(&mut self, column_id: &str) -> &mut ColumnOverride {
        self.column_overrides.entry(column_id.to_string()).or_default()
    }
}

/// The reference building used for calibration: an 8 m × 10 m plan on a
/// 2 × 2 bay grid with one suspended floor.
pub fn calibration_model() -> BuildingModel {
    BuildingModel::new(SpanConfig::new(vec![4.0, 4.0], vec![5.0, 5.0]))
        .with_floor(FloorConfig::new("L1", 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_bad_spans() {
        let spans = SpanConfig::new(vec![4.0, -2.0, 0.0], vec![f64::NAN]);
        let (clean, clamped) = spans.sanitized();
        assert_eq!(clean.x, vec![4.0, DEFAULT_SPAN_M, DEFAULT_SPAN_M]);
        assert_eq!(clean.y, vec![DEFAULT_SPAN_M]);
        assert_eq!(clamped.len(), 3);
        assert_eq!(clamped[0].index, 1);
    }

    #[test]
    fn test_sanitize_empty_sequence() {
        let (clean, clamped) = SpanConfig::new(vec![], vec![3.0]).sanitized();
        assert_eq!(clean.x, vec![DEFAULT_SPAN_M]);
        assert_eq!(clamped.len(), 1);
    }

    #[test]
    fn test_ordered_floors() {
        let model = BuildingModel::default()
            .with_floor(FloorConfig::new("Roof", 3))
            .with_floor(FloorConfig::new("L1", 1))
            .with_floor(FloorConfig::new("L2", 2));
        let ids: Vec<&str> = model.ordered_floors().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["L1", "L2", "Roof"]);
    }

    #[test]
    fn test_model_deserializes_with_defaults() {
        let json = r#"{ "spans": { "x": [4.0], "y": [5.0] } }"#;
        let model: BuildingModel = serde_json::from_str(json).unwrap();
        assert!(model.floors.is_empty());
        assert!(model.column_overrides.is_empty());
        assert_eq!(model.settings, DesignSettings::default());
    }
}
