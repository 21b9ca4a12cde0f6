//! Floor loading and gravity load combinations
//!
//! Slab loads are area pressures (kPa): slab self-weight plus superimposed
//! dead load, and occupancy live load. Walls are service line loads (kN/m)
//! that are factored as dead load.
//!
//! # Example
//!
//! ```
//! use loadpath_core::loads::FloorLoading;
//!
//! // 150 mm slab at 24 kN/m³, 2.0 kPa superimposed dead, 2.0 kPa live
//! let loading = FloorLoading::new(150.0, 24.0, 2.0, 2.0);
//! assert!((loading.dead_kpa() - 5.6).abs() < 1e-9);
//! assert!((loading.factored_pressure_kpa() - 9.92).abs() < 1e-9);
//! ```

pub mod combinations;

pub use combinations::{
    lrfd_gravity, service, LoadCombination, DEAD_LOAD_FACTOR, LIVE_LOAD_FACTOR,
    SERVICE_LOAD_DIVISOR,
};

use serde::{Deserialize, Serialize};

use crate::model::{DesignSettings, FloorConfig};

/// Gravity load categories carried by the load path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// D - Dead load (self-weight and permanent finishes)
    Dead,
    /// L - Live load (occupancy)
    Live,
}

impl LoadType {
    /// Standard abbreviation code
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "D",
            LoadType::Live => "L",
        }
    }
}

/// Unfactored load values for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadCase {
    pub dead: f64,
    pub live: f64,
}

impl LoadCase {
    pub fn new(dead: f64, live: f64) -> Self {
        LoadCase { dead, live }
    }

    pub fn get(&self, load_type: LoadType) -> f64 {
        match load_type {
            LoadType::Dead => self.dead,
            LoadType::Live => self.live,
        }
    }
}

/// Area loading of one floor slab (kPa)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorLoading {
    /// Slab self-weight (thickness × concrete density)
    pub slab_self_weight_kpa: f64,
    /// Finishes, services, partitions
    pub superimposed_dead_kpa: f64,
    /// Occupancy live load
    pub live_kpa: f64,
}

impl FloorLoading {
    /// Build from slab thickness (mm), concrete density (kN/m³), SDL and LL (kPa).
    /// Negative or non-finite inputs are clamped to zero.
    pub fn new(slab_thickness_mm: f64, density_kn_m3: f64, superimposed_dead_kpa: f64, live_kpa: f64) -> Self {
        FloorLoading {
            slab_self_weight_kpa: non_negative(slab_thickness_mm) / 1000.0 * non_negative(density_kn_m3),
            superimposed_dead_kpa: non_negative(superimposed_dead_kpa),
            live_kpa: non_negative(live_kpa),
        }
    }

    pub fn for_floor(floor: &FloorConfig, settings: &DesignSettings) -> Self {
        FloorLoading::new(
            floor.slab_thickness_mm,
            settings.concrete_density_kn_m3,
            floor.superimposed_dead_kpa,
            floor.live_kpa,
        )
    }

    pub fn dead_kpa(&self) -> f64 {
        self.slab_self_weight_kpa + self.superimposed_dead_kpa
    }

    pub fn load_case(&self) -> LoadCase {
        LoadCase::new(self.dead_kpa(), self.live_kpa)
    }

    /// Factored unit slab pressure q_u = 1.2D + 1.6L (kPa)
    pub fn factored_pressure_kpa(&self) -> f64 {
        lrfd_gravity().apply(&self.load_case())
    }

    /// Unfactored service pressure D + L (kPa)
    pub fn service_pressure_kpa(&self) -> f64 {
        service().apply(&self.load_case())
    }
}

/// Factored wall line load (kN/m) from a service wall load
pub fn factored_wall_load(wall_load_kn_per_m: f64) -> f64 {
    DEAD_LOAD_FACTOR * non_negative(wall_load_kn_per_m)
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
