//! Gravity load combinations
//!
//! Only the gravity strength combination and the service combination are
//! needed by the load path: lateral combinations are outside this engine.

use serde::{Deserialize, Serialize};

use super::{LoadCase, LoadType};

/// Dead load factor of the governing gravity combination
pub const DEAD_LOAD_FACTOR: f64 = 1.2;

/// Live load factor of the governing gravity combination
pub const LIVE_LOAD_FACTOR: f64 = 1.6;

/// Average load factor used to convert a factored column load back to a
/// service load for footing bearing checks (P_service = P_u / 1.4)
pub const SERVICE_LOAD_DIVISOR: f64 = 1.4;

/// A load combination with factors for each load type
///
/// # Example
/// ```
/// use loadpath_core::loads::{LoadCase, LoadCombination, LoadType};
///
/// let combo = LoadCombination::new("LRFD-2", "1.2D + 1.6L")
///     .with_factor(LoadType::Dead, 1.2)
///     .with_factor(LoadType::Live, 1.6);
///
/// let case = LoadCase::new(5.6, 2.0);
/// assert!((combo.apply(&case) - 9.92).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "LRFD-2")
    pub name: String,

    /// Human-readable equation for display (e.g., "1.2D + 1.6L")
    pub equation: String,

    /// Load factors by type; types not listed have factor 0
    pub factors: Vec<(LoadType, f64)>,
}

impl LoadCombination {
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            factors: Vec::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, load_type: LoadType, factor: f64) -> Self {
        self.factors.retain(|(lt, _)| *lt != load_type);
        self.factors.push((load_type, factor));
        self
    }

    /// Get the factor for a specific load type (0.0 if not in combination)
    pub fn get_factor(&self, load_type: LoadType) -> f64 {
        self.factors
            .iter()
            .find(|(lt, _)| *lt == load_type)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Apply this combination to a load case
    pub fn apply(&self, case: &LoadCase) -> f64 {
        self.factors
            .iter()
            .map(|(load_type, factor)| factor * case.get(*load_type))
            .sum()
    }
}

/// Governing gravity strength combination: 1.2D + 1.6L
pub fn lrfd_gravity() -> LoadCombination {
    LoadCombination::new("LRFD-2", "1.2D + 1.6L")
        .with_factor(LoadType::Dead, DEAD_LOAD_FACTOR)
        .with_factor(LoadType::Live, LIVE_LOAD_FACTOR)
}

/// Service combination: D + L
pub fn service() -> LoadCombination {
    LoadCombination::new("SLS-1", "D + L")
        .with_factor(LoadType::Dead, 1.0)
        .with_factor(LoadType::Live, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lrfd_gravity_factors() {
        let combo = lrfd_gravity();
        assert_eq!(combo.get_factor(LoadType::Dead), 1.2);
        assert_eq!(combo.get_factor(LoadType::Live), 1.6);
        assert_eq!(combo.equation, "1.2D + 1.6L");
    }

    #[test]
    fn test_with_factor_replaces_existing() {
        let combo = LoadCombination::new("T", "D")
            .with_factor(LoadType::Dead, 1.0)
            .with_factor(LoadType::Dead, 1.4);
        assert_eq!(combo.factors.len(), 1);
        assert_eq!(combo.get_factor(LoadType::Dead), 1.4);
    }

    #[test]
    fn test_service_combination() {
        let case = LoadCase::new(5.0, 2.0);
        assert_eq!(service().apply(&case), 7.0);
    }
}
