//! # Footing Sizer
//!
//! Square isolated footings under every grounded column, plus the tie beams
//! linking them.
//!
//! ## Formulas
//!
//! ```text
//! Tie beam:   b = 0.25 m,  h = max(0.30, ceil0.05(L_max / 10))
//!             share per column = 1.2 × γ × b × h × (2 × L_avg)
//!
//! Footing:    P_f = P_columns + 1.2 × W_column + tie share   [kN, factored]
//!             P_s = P_f / 1.4                               [kN, service]
//!             B   = max(0.6, ceil0.1(√(P_s / q_a)))          [m]
//!             t   = max(0.3, round0.1(B / 4))                [m]
//!             q   = P_s / B²,  bearing ratio = q / q_a       [kPa]
//! ```
//!
//! All footing undersides sit at `-footing_depth`; the tops step up by the
//! thickest footing so one level is shared.

use serde::{Deserialize, Serialize};

use super::columns::Column;
use super::grid::Grid;
use crate::loads::{non_negative, DEAD_LOAD_FACTOR, SERVICE_LOAD_DIVISOR};
use crate::model::DesignSettings;
use crate::units::{ceil_to_step, round_to_step};

pub const TIE_BEAM_WIDTH_M: f64 = 0.25;
pub const MIN_TIE_BEAM_DEPTH_M: f64 = 0.30;
pub const TIE_BEAM_DEPTH_STEP_M: f64 = 0.05;
pub const MIN_FOOTING_SIDE_M: f64 = 0.6;
pub const FOOTING_SIDE_STEP_M: f64 = 0.1;
pub const MIN_FOOTING_THICKNESS_M: f64 = 0.3;

/// Ground-level tie beam common to all footings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TieBeam {
    pub width_m: f64,
    pub depth_m: f64,
    /// Tie beam length attributed to each column (m)
    pub length_per_column_m: f64,
    /// Factored tie beam weight added to each footing (kN)
    pub load_per_column_kn: f64,
}

/// Isolated square footing; all zeros for columns without one
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Footing {
    pub side_m: f64,
    pub thickness_m: f64,
    /// P_f (kN)
    pub factored_load_kn: f64,
    /// P_s (kN)
    pub service_load_kn: f64,
    /// P_s / q_a (m²)
    pub required_area_m2: f64,
    /// Service soil pressure under the footing (kPa)
    pub bearing_pressure_kpa: f64,
    /// Soil pressure over allowable bearing; ≤ 1.0 passes
    pub bearing_ratio: f64,
    pub bottom_elevation_m: f64,
    pub top_elevation_m: f64,
}

impl Footing {
    pub fn exists(&self) -> bool {
        self.side_m > 0.0
    }

    pub fn area_m2(&self) -> f64 {
        self.side_m * self.side_m
    }

    pub fn volume_m3(&self) -> f64 {
        self.area_m2() * self.thickness_m
    }
}

/// Size the tie beam from the grid spans
pub fn size_tie_beam(grid: &Grid, settings: &DesignSettings) -> TieBeam {
    let depth = ceil_to_step(grid.longest_span() / 10.0, TIE_BEAM_DEPTH_STEP_M).max(MIN_TIE_BEAM_DEPTH_M);
    let length = 2.0 * grid.average_span();
    let load = DEAD_LOAD_FACTOR * non_negative(settings.concrete_density_kn_m3) * TIE_BEAM_WIDTH_M * depth * length;
    TieBeam {
        width_m: TIE_BEAM_WIDTH_M,
        depth_m: depth,
        length_per_column_m: length,
        load_per_column_kn: load,
    }
}

/// Size a footing for a factored load on soil with allowable bearing `q_a`
///
/// ```rust
/// use loadpath_core::calculations::footings::size_footing;
///
/// // P_s = 140 kN on 100 kPa → 1.4 m² → B = 1.2 m
/// let footing = size_footing(196.0, 100.0);
/// assert!((footing.side_m - 1.2).abs() < 1e-9);
/// assert!((footing.thickness_m - 0.3).abs() < 1e-9);
/// ```
pub fn size_footing(factored_load_kn: f64, soil_bearing_kpa: f64) -> Footing {
    let factored = non_negative(factored_load_kn);
    let service = factored / SERVICE_LOAD_DIVISOR;
    let required_area = service / soil_bearing_kpa;
    let side = ceil_to_step(required_area.sqrt(), FOOTING_SIDE_STEP_M).max(MIN_FOOTING_SIDE_M);
    let thickness = round_to_step(side / 4.0, FOOTING_SIDE_STEP_M).max(MIN_FOOTING_THICKNESS_M);
    let pressure = service / (side * side);
    Footing {
        side_m: side,
        thickness_m: thickness,
        factored_load_kn: factored,
        service_load_kn: service,
        required_area_m2: required_area,
        bearing_pressure_kpa: pressure,
        bearing_ratio: pressure / soil_bearing_kpa,
        bottom_elevation_m: 0.0,
        top_elevation_m: thickness,
    }
}

/// Size footings under every grounded column and set the shared elevations.
/// Returns the governing (maximum) footing thickness.
pub fn size_footings(columns: &mut [Column], tie: &TieBeam, settings: &DesignSettings) -> f64 {
    let soil = settings.effective_soil_bearing_kpa();
    let bottom = -non_negative(settings.footing_depth_m);

    for column in columns.iter_mut() {
        column.footing = if column.is_grounded() {
            let load = column.total_load_kn + DEAD_LOAD_FACTOR * column.self_weight_kn + tie.load_per_column_kn;
            size_footing(load, soil)
        } else {
            Footing::default()
        };
    }

    let max_thickness = columns
        .iter()
        .filter(|c| c.footing.exists())
        .map(|c| c.footing.thickness_m)
        .fold(0.0, f64::max);

    for column in columns.iter_mut().filter(|c| c.footing.exists()) {
        column.footing.bottom_elevation_m = bottom;
        column.footing.top_elevation_m = bottom + max_thickness;
    }

    tracing::debug!(soil_kpa = soil, max_thickness, "footings sized");
    max_thickness
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::columns::ColumnClass;
    use crate::calculations::diagnostics::Diagnostics;
    use crate::calculations::grid::GridIndex;
    use crate::geometry::Point;
    use crate::model::SpanConfig;
    use approx::assert_relative_eq;

    #[test]
    fn test_tie_beam_from_spans() {
        let grid = Grid::from_spans(&SpanConfig::new(vec![4.0, 4.0], vec![5.0, 5.0]), &mut Diagnostics::new());
        let tie = size_tie_beam(&grid, &DesignSettings::default());
        assert_relative_eq!(tie.depth_m, 0.5, epsilon = 1e-9);
        assert_relative_eq!(tie.length_per_column_m, 9.0);
        // 1.2 × 24 × 0.25 × 0.5 × 9.0
        assert_relative_eq!(tie.load_per_column_kn, 32.4, epsilon = 1e-9);
    }

    #[test]
    fn test_short_spans_use_min_tie_depth() {
        let grid = Grid::from_spans(&SpanConfig::new(vec![3.0], vec![2.0]), &mut Diagnostics::new());
        let tie = size_tie_beam(&grid, &DesignSettings::default());
        assert_relative_eq!(tie.depth_m, MIN_TIE_BEAM_DEPTH_M);
    }

    #[test]
    fn test_minimum_footing() {
        let footing = size_footing(0.0, 100.0);
        assert_relative_eq!(footing.side_m, 0.6);
        assert_relative_eq!(footing.thickness_m, 0.3);
    }

    #[test]
    fn test_bearing_pressure_check() {
        // P_s = 140 kN on a 1.2 m square
        let footing = size_footing(196.0, 100.0);
        assert_relative_eq!(footing.bearing_pressure_kpa, 140.0 / 1.44, epsilon = 1e-9);
        assert_relative_eq!(footing.bearing_ratio, 140.0 / 144.0, epsilon = 1e-9);
        assert!(footing.bearing_ratio <= 1.0);
        assert_relative_eq!(size_footing(0.0, 100.0).bearing_ratio, 0.0);
    }

    #[test]
    fn test_off_grid_column_gets_footing() {
        let mut column = Column::new("P1", Point::new(2.0, 2.5), None, ColumnClass::Interior);
        column.total_load_kn = 196.0;
        let mut columns = vec![column];
        size_footings(&mut columns, &TieBeam::default(), &DesignSettings::default());
        assert_relative_eq!(columns[0].footing.side_m, 1.2, epsilon = 1e-9);
    }

    #[test]
    fn test_large_footing_thickness() {
        // P_s = 1000 kN on 100 kPa → √10 = 3.16 → 3.2 m, t = 0.8 m
        let footing = size_footing(1400.0, 100.0);
        assert_relative_eq!(footing.side_m, 3.2, epsilon = 1e-9);
        assert_relative_eq!(footing.thickness_m, 0.8, epsilon = 1e-9);
    }

    #[test]
    fn test_shared_elevations_and_planted_skip() {
        let mut light = Column::new("A1", Point::new(0.0, 0.0), Some(GridIndex::new(0, 0)), ColumnClass::Corner);
        light.total_load_kn = 10.0;
        let mut heavy = Column::new("B2", Point::new(4.0, 5.0), Some(GridIndex::new(1, 1)), ColumnClass::Interior);
        heavy.total_load_kn = 1400.0;
        let mut planted = Column::new("P1", Point::new(2.0, 5.0), None, ColumnClass::Interior);
        planted.start_floor = Some("L2".to_string());
        let mut columns = vec![light, heavy, planted];

        let tie = TieBeam::default();
        let max = size_footings(&mut columns, &tie, &DesignSettings::default());
        assert_relative_eq!(max, 0.8, epsilon = 1e-9);
        assert_relative_eq!(columns[0].footing.bottom_elevation_m, -1.5);
        assert_relative_eq!(columns[0].footing.top_elevation_m, -0.7, epsilon = 1e-9);
        assert!(!columns[2].footing.exists());
    }
}
