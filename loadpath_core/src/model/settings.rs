//! Global design settings: materials, soil, foundation level, fixed sections.

use serde::{Deserialize, Serialize};

use crate::units::Millimeters;

/// How the lowest floor is supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroundFloor {
    /// Lowest floor is a framed slab and is analysed like any other
    #[default]
    Suspended,
    /// Lowest floor bears directly on the ground and is excluded from the load path
    SlabOnGrade,
}

/// Rectangular member section (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectSection {
    pub width: Millimeters,
    pub depth: Millimeters,
}

impl RectSection {
    pub fn new(width_mm: f64, depth_mm: f64) -> Self {
        RectSection {
            width: Millimeters(width_mm),
            depth: Millimeters(depth_mm),
        }
    }

    pub fn square(side_mm: f64) -> Self {
        RectSection::new(side_mm, side_mm)
    }

    /// Gross area (mm²)
    pub fn area_mm2(&self) -> f64 {
        self.width.0 * self.depth.0
    }

    /// Gross area (m²)
    pub fn area_m2(&self) -> f64 {
        self.width.meters() * self.depth.meters()
    }

    /// False for zero, negative, or non-finite dimensions
    pub fn is_valid(&self) -> bool {
        self.width.0.is_finite() && self.depth.0.is_finite() && self.width.0 > 0.0 && self.depth.0 > 0.0
    }
}

impl std::fmt::Display for RectSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}x{:.0}", self.width.0, self.depth.0)
    }
}

/// Global settings applied to every floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Concrete compressive strength f'c (MPa)
    pub fc_mpa: f64,

    /// Reinforcement yield strength f_y (MPa)
    pub fy_mpa: f64,

    /// Reinforced concrete unit weight (kN/m³)
    pub concrete_density_kn_m3: f64,

    /// Allowable soil bearing pressure (kPa)
    pub soil_bearing_kpa: f64,

    /// Depth of footing underside below grade (m)
    pub footing_depth_m: f64,

    /// Fixed column section; bypasses axial sizing when set
    pub column_section: Option<RectSection>,

    /// Fixed beam section; bypasses span/depth sizing when set and makes beam
    /// self-weight part of the column loads
    pub beam_section: Option<RectSection>,

    pub ground_floor: GroundFloor,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            fc_mpa: 28.0,
            fy_mpa: 415.0,
            concrete_density_kn_m3: 24.0,
            soil_bearing_kpa: 100.0,
            footing_depth_m: 1.5,
            column_section: None,
            beam_section: None,
            ground_floor: GroundFloor::Suspended,
        }
    }
}

impl DesignSettings {
    /// Fixed beam section when configured and valid
    pub fn fixed_beam_section(&self) -> Option<RectSection> {
        self.beam_section.filter(RectSection::is_valid)
    }

    /// Fixed column section when configured and valid
    pub fn fixed_column_section(&self) -> Option<RectSection> {
        self.column_section.filter(RectSection::is_valid)
    }

    /// Soil bearing used for sizing; a non-positive value falls back to the default
    pub fn effective_soil_bearing_kpa(&self) -> f64 {
        if self.soil_bearing_kpa.is_finite() && self.soil_bearing_kpa > 0.0 {
            self.soil_bearing_kpa
        } else {
            DesignSettings::default().soil_bearing_kpa
        }
    }
}
