//! # Unit Types
//!
//! Lightweight SI wrappers used where a value crosses between metre-based
//! geometry and millimetre-based member sections. Each is a `#[serde(transparent)]`
//! newtype so JSON stays plain numbers.
//!
//! Conventions used across the crate:
//! - Geometry, spans, heights: metres (m)
//! - Member section dimensions: millimetres (mm)
//! - Forces: kilonewtons (kN); pressures: kilopascals (kPa)
//! - Material strengths: megapascals (MPa = N/mm²); density: kN/m³
//!
//! ## Example
//!
//! ```rust
//! use loadpath_core::units::{Meters, Millimeters};
//!
//! let depth = Millimeters(350.0);
//! let depth_m: Meters = depth.into();
//! assert!((depth_m.0 - 0.35).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl Millimeters {
    /// Value in metres
    pub fn meters(self) -> f64 {
        self.0 / 1000.0
    }
}

impl Add for Millimeters {
    type Output = Millimeters;
    fn add(self, rhs: Millimeters) -> Millimeters {
        Millimeters(self.0 + rhs.0)
    }
}

impl Mul<f64> for Millimeters {
    type Output = Millimeters;
    fn mul(self, rhs: f64) -> Millimeters {
        Millimeters(self.0 * rhs)
    }
}

// ============================================================================
// Rounding
// ============================================================================

/// Relative slack so that values like `0.3 / 0.05` (5.999...) do not round up a step.
const STEP_EPSILON: f64 = 1e-9;

/// Round `value` up to the next multiple of `step`.
///
/// ```rust
/// use loadpath_core::units::ceil_to_step;
/// assert_eq!(ceil_to_step(312.5, 50.0), 350.0);
/// assert_eq!(ceil_to_step(300.0, 50.0), 300.0);
/// ```
pub fn ceil_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 || !value.is_finite() {
        return value;
    }
    (value / step - STEP_EPSILON).ceil() * step
}

/// Round `value` to the nearest multiple of `step` (halves round away from zero).
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 || !value.is_finite() {
        return value;
    }
    (value / step + STEP_EPSILON).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let mm: Millimeters = Meters(1.25).into();
        assert_eq!(mm.0, 1250.0);
        let m: Meters = Millimeters(200.0).into();
        assert_eq!(m.0, 0.2);
        assert_eq!(Millimeters(450.0).meters(), 0.45);
    }

    #[test]
    fn test_ceil_to_step_absorbs_float_noise() {
        // 0.3 / 0.05 is 5.999999999999999 in binary floating point
        assert!((ceil_to_step(0.3, 0.05) - 0.3).abs() < 1e-12);
        assert!((ceil_to_step(0.31, 0.05) - 0.35).abs() < 1e-12);
        assert_eq!(ceil_to_step(0.0, 50.0), 0.0);
    }

    #[test]
    fn test_round_to_step() {
        assert_eq!(round_to_step(175.0, 50.0), 200.0);
        assert_eq!(round_to_step(160.0, 50.0), 150.0);
        assert!((round_to_step(0.25, 0.1) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_serialization_is_transparent() {
        let json = serde_json::to_string(&Millimeters(300.0)).unwrap();
        assert_eq!(json, "300.0");
    }
}
