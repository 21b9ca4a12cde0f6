//! # Member Sizer
//!
//! Preliminary sizes for columns and beams, plus the capacity checks that
//! report how hard each sized member is working.
//!
//! ## Column Formulas (tied column, axial only)
//!
//! ```text
//! φPn = φ × 0.80 × [0.85 f'c (Ag − Ast) + fy Ast]      φ = 0.65
//! Ag  = Pu / (φ × 0.80 × [0.85 f'c (1 − ρ) + fy ρ])     ρ = 0.01
//! side = max(200, ceil50(√Ag))                          [mm]
//! ```
//!
//! With a fixed section the required steel ratio is back-calculated and
//! clamped to 1%..8%.
//!
//! ## Beam Formulas
//!
//! ```text
//! h = max(300, ceil50(L / 16))     (cantilever: L / 8)  [mm]
//! b = round50(h / 2)
//! Mu = w L² / 8                    (cantilever: w L² / 2)
//! φMn = φ As fy (d − a/2),  a = As fy / (0.85 f'c b),  φ = 0.90
//! deflection ratio = (L / 16) / h  (cantilever: L / 8), ≤ 1.0 passes
//! ```

use serde::{Deserialize, Serialize};

use super::beams::{Beam, BeamKind};
use super::columns::Column;
use crate::loads::{non_negative, DEAD_LOAD_FACTOR};
use crate::model::{BuildingModel, DesignSettings, RectSection};
use crate::units::{ceil_to_step, round_to_step};

/// Strength reduction factor for tied columns
pub const COLUMN_PHI: f64 = 0.65;

/// Accidental eccentricity factor for tied columns
pub const AXIAL_REDUCTION: f64 = 0.80;

pub const MIN_REINFORCEMENT_RATIO: f64 = 0.01;
pub const MAX_REINFORCEMENT_RATIO: f64 = 0.08;

pub const MIN_COLUMN_SIDE_MM: f64 = 200.0;
pub const MIN_BEAM_DEPTH_MM: f64 = 300.0;

/// Section dimension increment (mm)
pub const SECTION_STEP_MM: f64 = 50.0;

/// Strength reduction factor for flexure
pub const BEAM_PHI: f64 = 0.90;

/// Tension steel ratio assumed for beam capacity checks
pub const BEAM_REINFORCEMENT_RATIO: f64 = 0.012;

/// Depth to tension steel centroid below the section depth (mm)
pub const BEAM_COVER_MM: f64 = 50.0;

/// Axial capacity check of a sized column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnCapacity {
    /// φPn (kN)
    pub axial_capacity_kn: f64,
    /// Pu / φPn
    pub utilization: f64,
}

/// Flexural check of a sized beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamDesign {
    /// Line load including the section's factored self-weight (kN/m)
    pub design_load_kn_per_m: f64,
    /// Mu (kN·m)
    pub design_moment_knm: f64,
    /// φMn (kN·m)
    pub moment_capacity_knm: f64,
    pub utilization: f64,
    /// Minimum depth for deflection control over the actual depth
    pub deflection_ratio: f64,
}

/// Material strengths with non-positive values replaced by the defaults
fn materials(settings: &DesignSettings) -> (f64, f64) {
    let defaults = DesignSettings::default();
    let fc = if settings.fc_mpa.is_finite() && settings.fc_mpa > 0.0 {
        settings.fc_mpa
    } else {
        defaults.fc_mpa
    };
    let fy = if settings.fy_mpa.is_finite() && settings.fy_mpa > 0.0 {
        settings.fy_mpa
    } else {
        defaults.fy_mpa
    };
    (fc, fy)
}

/// Design axial stress on the gross section for a steel ratio (MPa)
pub fn axial_stress_capacity(settings: &DesignSettings, rho: f64) -> f64 {
    let (fc, fy) = materials(settings);
    COLUMN_PHI * AXIAL_REDUCTION * (0.85 * fc * (1.0 - rho) + fy * rho)
}

/// Gross area needed for a factored axial load at minimum steel (mm²)
pub fn required_column_area_mm2(factored_load_kn: f64, settings: &DesignSettings) -> f64 {
    non_negative(factored_load_kn) * 1000.0 / axial_stress_capacity(settings, MIN_REINFORCEMENT_RATIO)
}

/// Square column side for a factored axial load (mm)
///
/// ```rust
/// use loadpath_core::calculations::sizing::size_column_side_mm;
/// use loadpath_core::model::DesignSettings;
///
/// let settings = DesignSettings::default();
/// assert_eq!(size_column_side_mm(0.0, &settings), 200.0);
/// assert_eq!(size_column_side_mm(800.0, &settings), 250.0);
/// ```
pub fn size_column_side_mm(factored_load_kn: f64, settings: &DesignSettings) -> f64 {
    let side = required_column_area_mm2(factored_load_kn, settings).sqrt();
    ceil_to_step(side, SECTION_STEP_MM).max(MIN_COLUMN_SIDE_MM)
}

/// Steel ratio a fixed section needs for the load, clamped to 1%..8%
pub fn required_reinforcement_ratio(factored_load_kn: f64, section: &RectSection, settings: &DesignSettings) -> f64 {
    let (fc, fy) = materials(settings);
    let area = section.area_mm2();
    let steel_margin = fy - 0.85 * fc;
    if area <= 0.0 || steel_margin <= 0.0 {
        return MIN_REINFORCEMENT_RATIO;
    }
    let stress = non_negative(factored_load_kn) * 1000.0 / (COLUMN_PHI * AXIAL_REDUCTION * area);
    ((stress - 0.85 * fc) / steel_margin).clamp(MIN_REINFORCEMENT_RATIO, MAX_REINFORCEMENT_RATIO)
}

/// φPn of a section at a steel ratio (kN)
pub fn column_axial_capacity_kn(section: &RectSection, rho: f64, settings: &DesignSettings) -> f64 {
    axial_stress_capacity(settings, rho) * section.area_mm2() / 1000.0
}

/// Preliminary beam section from span and kind
pub fn size_beam(span_m: f64, kind: &BeamKind) -> RectSection {
    let depth = ceil_to_step(non_negative(span_m) * 1000.0 / kind.span_depth_ratio(), SECTION_STEP_MM)
        .max(MIN_BEAM_DEPTH_MM);
    let width = round_to_step(depth / 2.0, SECTION_STEP_MM);
    RectSection::new(width, depth)
}

/// Flexural capacity of a rectangular section at the assumed steel ratio (kN·m)
pub fn beam_moment_capacity_knm(section: &RectSection, settings: &DesignSettings) -> f64 {
    let (fc, fy) = materials(settings);
    let b = section.width.0;
    let d = (section.depth.0 - BEAM_COVER_MM).max(1.0);
    let steel = BEAM_REINFORCEMENT_RATIO * b * d;
    let a = steel * fy / (0.85 * fc * b);
    BEAM_PHI * steel * fy * (d - a / 2.0) / 1.0e6
}

/// Span/depth deflection check: required minimum depth over the section depth.
///
/// ```rust
/// use loadpath_core::calculations::sizing::beam_deflection_ratio;
/// use loadpath_core::calculations::{BeamKind, GridIndex};
/// use loadpath_core::model::RectSection;
///
/// let kind = BeamKind::Standard { start: GridIndex::new(0, 0), end: GridIndex::new(1, 0) };
/// // 8 m / 16 = 500 mm needed, 400 mm provided
/// let ratio = beam_deflection_ratio(8.0, &kind, &RectSection::new(200.0, 400.0));
/// assert!((ratio - 1.25).abs() < 1e-12);
/// ```
pub fn beam_deflection_ratio(span_m: f64, kind: &BeamKind, section: &RectSection) -> f64 {
    let min_depth = non_negative(span_m) * 1000.0 / kind.span_depth_ratio();
    utilization(min_depth, section.depth.0)
}

fn utilization(demand: f64, capacity: f64) -> f64 {
    if capacity > 0.0 {
        demand / capacity
    } else {
        0.0
    }
}

/// Size every active column and compute its self-weight and capacity check.
///
/// Self-weight sums γ × section area × storey height over the floors the
/// column is present on, using per-floor section overrides where given.
pub fn size_columns(columns: &mut [Column], model: &BuildingModel) {
    let settings = &model.settings;
    let density = non_negative(settings.concrete_density_kn_m3);
    for column in columns.iter_mut().filter(|c| c.active) {
        let load = column.total_load_kn;
        let (section, rho) = match column.section_override.or(settings.fixed_column_section()) {
            Some(fixed) => (fixed, required_reinforcement_ratio(load, &fixed, settings)),
            None => (RectSection::square(size_column_side_mm(load, settings)), MIN_REINFORCEMENT_RATIO),
        };
        column.section = Some(section);
        column.reinforcement_ratio = rho;

        let capacity = column_axial_capacity_kn(&section, rho, settings);
        column.capacity = Some(ColumnCapacity {
            axial_capacity_kn: capacity,
            utilization: utilization(load, capacity),
        });

        column.self_weight_kn = column
            .present_floors()
            .filter_map(|l| {
                let floor = model.floor(&l.floor_id)?;
                let section = column.section_on(&l.floor_id)?;
                Some(density * section.area_m2() * floor.effective_height_m())
            })
            .sum();
    }
}

/// Size the beams of one floor and check their flexure.
///
/// A fixed beam section from the settings replaces the derived size.
pub fn size_beams(beams: &mut [Beam], settings: &DesignSettings) {
    let density = non_negative(settings.concrete_density_kn_m3);
    let fixed = settings.fixed_beam_section();
    for beam in beams.iter_mut() {
        let section = fixed.unwrap_or_else(|| size_beam(beam.span_m, &beam.kind));
        let w = beam.line_load_kn_per_m + DEAD_LOAD_FACTOR * density * section.area_m2();
        let l = beam.span_m;
        let moment = if beam.kind.is_cantilever() {
            w * l * l / 2.0
        } else {
            w * l * l / 8.0
        };
        let capacity = beam_moment_capacity_knm(&section, settings);
        beam.section = Some(section);
        beam.design = Some(BeamDesign {
            design_load_kn_per_m: w,
            design_moment_knm: moment,
            moment_capacity_knm: capacity,
            utilization: utilization(moment, capacity),
            deflection_ratio: beam_deflection_ratio(l, &beam.kind, &section),
        });
    }
}
