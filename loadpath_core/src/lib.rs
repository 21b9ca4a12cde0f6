//! # loadpath_core - Gravity Load Path Engine
//!
//! `loadpath_core` computes the gravity load path of a rectangular
//! reinforced-concrete frame: slab loads go to beams by 45° (two-way) or
//! half-split (one-way) tributary areas, beams hand their end reactions to
//! columns, columns accumulate loads floor by floor, and footings and tie
//! beams are sized from the accumulated loads.
//!
//! ## Design Philosophy
//!
//! - **Pure pipeline**: [`calculations::analyze`] takes an immutable
//!   [`model::BuildingModel`] and returns a fresh [`calculations::Analysis`]
//! - **Never fails**: bad input is clamped or skipped and reported as a
//!   structured [`calculations::Diagnostic`]
//! - **JSON-First**: every input and output type implements Serialize/Deserialize
//! - **Stable ids**: columns, beams and panels are named from grid position so
//!   user overrides survive regeneration
//!
//! ## Quick Start
//!
//! ```rust
//! use loadpath_core::calculations::analyze;
//! use loadpath_core::model::{BuildingModel, FloorConfig, SpanConfig};
//!
//! let model = BuildingModel::new(SpanConfig::new(vec![4.0, 4.0], vec![5.0, 5.0]))
//!     .with_floor(FloorConfig::new("L1", 1))
//!     .with_floor(FloorConfig::new("L2", 2));
//!
//! let analysis = analyze(&model);
//! let interior = analysis.column("B2").unwrap();
//! assert_eq!(interior.floor_loads.len(), 2);
//!
//! let json = serde_json::to_string_pretty(&analysis).unwrap();
//! assert!(json.contains("\"B2\""));
//! ```
//!
//! ## Modules
//!
//! - [`model`] - Building input: spans, floors, settings, column overrides
//! - [`calculations`] - The load path stages and the [`calculations::Analysis`] result
//! - [`loads`] - Floor loading and load combinations
//! - [`geometry`] - Plan points, rectangles, polygons, segments
//! - [`project`] - Project container with editing commands
//! - [`units`] - Unit wrappers and rounding helpers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Reading a building model from JSON

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod geometry;
pub mod loads;
pub mod model;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{analyze, Analysis, Diagnostic};
pub use errors::{CalcError, CalcResult};
pub use file_io::load_model;
pub use model::BuildingModel;
pub use project::{Project, ProjectMetadata};
