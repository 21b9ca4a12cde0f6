//! Concrete quantities for the whole building.

use serde::{Deserialize, Serialize};

use super::columns::Column;
use super::footings::TieBeam;
use super::grid::Grid;
use super::FloorAnalysis;
use crate::loads::non_negative;
use crate::model::BuildingModel;

/// Concrete volume by member group (m³) and the resulting weight
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialTakeoff {
    pub slab_m3: f64,
    /// Beam stems below the slab soffit
    pub beam_m3: f64,
    pub column_m3: f64,
    pub footing_m3: f64,
    pub tie_beam_m3: f64,
    pub total_m3: f64,
    /// Total unfactored concrete weight (kN)
    pub total_weight_kn: f64,
}

impl MaterialTakeoff {
    pub fn compute(
        grid: &Grid,
        floors: &[FloorAnalysis],
        columns: &[Column],
        tie: &TieBeam,
        model: &BuildingModel,
    ) -> Self {
        let mut takeoff = MaterialTakeoff::default();

        for floor in floors {
            let thickness_m = model
                .floor(&floor.floor_id)
                .map_or(0.0, |f| non_negative(f.slab_thickness_mm) / 1000.0);
            takeoff.slab_m3 += floor.panels.iter().map(|p| p.loaded_area_m2()).sum::<f64>() * thickness_m;
            takeoff.beam_m3 += floor
                .beams
                .iter()
                .filter_map(|b| {
                    let section = b.section?;
                    let stem = (section.depth.meters() - thickness_m).max(0.0);
                    Some(section.width.meters() * stem * b.span_m)
                })
                .sum::<f64>();
        }

        for column in columns.iter().filter(|c| c.active) {
            takeoff.column_m3 += column
                .present_floors()
                .filter_map(|l| {
                    let height = model.floor(&l.floor_id)?.effective_height_m();
                    Some(column.section_on(&l.floor_id)?.area_m2() * height)
                })
                .sum::<f64>();
            takeoff.footing_m3 += column.footing.volume_m3();
        }

        if columns.iter().any(|c| c.footing.exists()) {
            takeoff.tie_beam_m3 = tie.width_m * tie.depth_m * grid.total_grid_line_length();
        }

        takeoff.total_m3 =
            takeoff.slab_m3 + takeoff.beam_m3 + takeoff.column_m3 + takeoff.footing_m3 + takeoff.tie_beam_m3;
        takeoff.total_weight_kn = takeoff.total_m3 * non_negative(model.settings.concrete_density_kn_m3);
        takeoff
    }
}

#[cfg(test)]
mod tests {
    use crate::calculations::analyze;
    use crate::model::calibration_model;
    use approx::assert_relative_eq;

    #[test]
    fn test_calibration_quantities() {
        let analysis = analyze(&calibration_model());
        let takeoff = analysis.takeoff;
        // 80 m² × 0.15 m
        assert_relative_eq!(takeoff.slab_m3, 12.0, epsilon = 1e-9);
        // 9 columns × 0.2 × 0.2 × 3.0
        assert_relative_eq!(takeoff.column_m3, 1.08, epsilon = 1e-9);
        // Six 4 m beams at 150 × 300 and six 5 m beams at 200 × 350
        assert_relative_eq!(takeoff.beam_m3, 6.0 * 0.15 * 0.15 * 4.0 + 6.0 * 0.2 * 0.2 * 5.0, epsilon = 1e-9);
        assert!(takeoff.footing_m3 > 0.0);
        assert_relative_eq!(
            takeoff.total_weight_kn,
            takeoff.total_m3 * 24.0,
            epsilon = 1e-9
        );
    }
}
