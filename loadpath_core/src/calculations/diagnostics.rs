//! Structured analysis events.
//!
//! Every clamp, skip and prune the pipeline performs is recorded as a
//! [`Diagnostic`] and returned with the analysis, so callers (and tests) can
//! inspect exactly what was defaulted instead of parsing log output. Each
//! event is also mirrored to `tracing`.

use serde::{Deserialize, Serialize};

use crate::geometry::Direction;

/// Why a column received no load on a floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Column is deactivated globally
    Inactive,
    /// Column is deactivated on this floor only
    InactiveOnFloor,
    /// Planted column whose start floor is above this floor
    BelowStartFloor,
}

impl SkipReason {
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::Inactive => "column inactive",
            SkipReason::InactiveOnFloor => "column inactive on this floor",
            SkipReason::BelowStartFloor => "planted column starts higher",
        }
    }
}

/// One inspectable event raised during an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Diagnostic {
    /// A non-positive span was replaced by the default span
    SpanClamped {
        direction: Direction,
        index: usize,
        value: f64,
        replacement: f64,
    },

    /// The lowest floor bears on grade and was left out of the load path
    FloorExcluded { floor_id: String },

    /// Void references that no longer match any panel were dropped
    VoidPanelsPruned { floor_id: String, panel_ids: Vec<String> },

    /// Part of a panel's area found no bounding beam (e.g. a deleted beam)
    PanelUnderAllocated {
        floor_id: String,
        panel_id: String,
        missing_area_m2: f64,
    },

    /// A crossing custom beam picked up an additive strip of slab
    CustomBeamStrip {
        floor_id: String,
        beam_id: String,
        panel_id: String,
        area_m2: f64,
    },

    /// A custom beam with zero length or non-finite geometry was ignored
    CustomBeamIgnored { floor_id: String, beam_id: String },

    /// A cantilever panel's grid edge beam does not exist
    CantileverWithoutEdgeBeam {
        floor_id: String,
        panel_id: String,
        edge_beam_id: String,
    },

    /// A beam end reaction found no column to land on
    UnsupportedReaction {
        floor_id: String,
        beam_id: String,
        load_kn: f64,
    },

    /// A column was skipped on a floor; any load framing into it is dropped
    ColumnSkipped {
        floor_id: String,
        column_id: String,
        reason: SkipReason,
        dropped_load_kn: f64,
    },

    /// A planted column coincides with a grid column and was merged onto it
    PlantedColumnMerged { planted_id: String, column_id: String },
}

/// Collector that records events in order and mirrors them to `tracing`
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn push(&mut self, event: Diagnostic) {
        match &event {
            Diagnostic::PanelUnderAllocated { .. }
            | Diagnostic::UnsupportedReaction { .. }
            | Diagnostic::CantileverWithoutEdgeBeam { .. }
            | Diagnostic::CustomBeamIgnored { .. } => tracing::warn!(?event, "load path"),
            _ => tracing::debug!(?event, "load path"),
        }
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_preserve_order() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::FloorExcluded { floor_id: "G".into() });
        diags.push(Diagnostic::PlantedColumnMerged {
            planted_id: "P1".into(),
            column_id: "B2".into(),
        });
        assert_eq!(diags.len(), 2);
        let events = diags.into_vec();
        assert!(matches!(events[0], Diagnostic::FloorExcluded { .. }));
    }

    #[test]
    fn test_diagnostic_json_is_tagged() {
        let event = Diagnostic::ColumnSkipped {
            floor_id: "L1".into(),
            column_id: "B2".into(),
            reason: SkipReason::BelowStartFloor,
            dropped_load_kn: 0.0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"ColumnSkipped""#));
        assert!(json.contains("BelowStartFloor"));
    }
}
