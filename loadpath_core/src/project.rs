//! # Project Data Structures
//!
//! The `Project` struct is the root container for one building: the
//! building model, who it belongs to, and the latest analysis. It serializes
//! to JSON for whichever tool hosts it.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── model: BuildingModel (spans, floors, settings, column overrides)
//! └── analysis: Option<Analysis> (not saved; rebuilt by `recalculate`)
//! ```
//!
//! Every editing command mutates the model and re-runs the load path, so the
//! stored analysis is never stale.
//!
//! ## Example
//!
//! ```rust
//! use loadpath_core::model::FloorConfig;
//! use loadpath_core::project::Project;
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! project.set_spans(vec![4.0, 4.0], vec![5.0, 5.0]);
//! project.add_floor(FloorConfig::new("L1", 1)).unwrap();
//!
//! let b2 = project.analysis().column("B2").unwrap();
//! assert!(b2.total_load_kn > 190.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{analyze, Analysis};
use crate::errors::{CalcError, CalcResult};
use crate::geometry::Direction;
use crate::model::{BuildingModel, CustomBeam, FloorConfig, PlantedColumn, SpanConfig};

/// Schema version stamped into project metadata
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// The building being analysed
    pub model: BuildingModel,

    /// Result of the last run; rebuilt after loading
    #[serde(skip)]
    analysis: Option<Analysis>,
}

impl Project {
    /// Create a new project with the default 2 × 2 grid and no floors.
    ///
    /// # Example
    ///
    /// ```rust
    /// use loadpath_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Client Corp");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// ```
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        Project::with_model(engineer, job_id, client, BuildingModel::default())
    }

    /// Create a project around an existing model and analyse it.
    pub fn with_model(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
        model: BuildingModel,
    ) -> Self {
        let now = Utc::now();
        let mut project = Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            model,
            analysis: None,
        };
        project.recalculate();
        project
    }

    /// Re-run the load path and store the result.
    ///
    /// Void references the partitioner pruned are removed from the stored
    /// floors as well.
    pub fn recalculate(&mut self) -> &Analysis {
        let analysis = analyze(&self.model);
        for (floor_id, pruned) in &analysis.pruned_void_panels {
            if let Some(floor) = self.model.floor_mut(floor_id) {
                for id in pruned {
                    floor.void_panels.remove(id);
                }
            }
        }
        self.analysis.insert(analysis)
    }

    /// The current analysis, computed on first access after loading.
    pub fn analysis(&mut self) -> &Analysis {
        if self.analysis.is_none() {
            self.recalculate();
        }
        self.analysis.get_or_insert_with(|| analyze(&self.model))
    }

    /// The stored analysis without recomputing
    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    fn commit(&mut self) {
        self.touch();
        self.recalculate();
    }

    fn floor_mut(&mut self, floor_id: &str) -> CalcResult<&mut FloorConfig> {
        self.model
            .floor_mut(floor_id)
            .ok_or_else(|| CalcError::floor_not_found(floor_id))
    }

    fn require_column(&mut self, column_id: &str) -> CalcResult<()> {
        if self.analysis().column(column_id).is_some() {
            Ok(())
        } else {
            Err(CalcError::member_not_found("Column", column_id))
        }
    }

    // ---- grid ----

    /// Replace the span sequences. Column overrides are kept by id, so
    /// columns at surviving grid positions keep their settings.
    pub fn set_spans(&mut self, x: Vec<f64>, y: Vec<f64>) {
        self.model.spans = SpanConfig::new(x, y);
        self.commit();
    }

    // ---- floors ----

    pub fn add_floor(&mut self, floor: FloorConfig) -> CalcResult<()> {
        if self.model.floor(&floor.id).is_some() {
            return Err(CalcError::invalid_input("floor.id", floor.id, "a floor with this id already exists"));
        }
        self.model.floors.push(floor);
        self.commit();
        Ok(())
    }

    /// Replace the floor with the same id
    pub fn update_floor(&mut self, floor: FloorConfig) -> CalcResult<()> {
        let id = floor.id.clone();
        *self.floor_mut(&id)? = floor;
        self.commit();
        Ok(())
    }

    pub fn remove_floor(&mut self, floor_id: &str) -> CalcResult<FloorConfig> {
        let index = self
            .model
            .floors
            .iter()
            .position(|f| f.id == floor_id)
            .ok_or_else(|| CalcError::floor_not_found(floor_id))?;
        let removed = self.model.floors.remove(index);
        self.commit();
        Ok(removed)
    }

    // ---- beams ----

    /// Add a custom beam to a floor and return its generated id.
    pub fn add_custom_beam(
        &mut self,
        floor_id: &str,
        direction: Direction,
        offset: f64,
        start: f64,
        end: f64,
    ) -> CalcResult<String> {
        let id = format!("BM-{}", short_id());
        let beam = CustomBeam::new(id.clone(), direction, offset, start, end);
        if !beam.is_valid() {
            return Err(CalcError::invalid_input(
                "custom_beam",
                format!("{offset} / {start}..{end}"),
                "beam must have a finite, non-zero length",
            ));
        }
        self.floor_mut(floor_id)?.custom_beams.push(beam);
        self.commit();
        Ok(id)
    }

    pub fn remove_custom_beam(&mut self, floor_id: &str, beam_id: &str) -> CalcResult<CustomBeam> {
        let floor = self.floor_mut(floor_id)?;
        let index = floor
            .custom_beams
            .iter()
            .position(|b| b.id == beam_id)
            .ok_or_else(|| CalcError::member_not_found("Custom beam", beam_id))?;
        let removed = floor.custom_beams.remove(index);
        self.commit();
        Ok(removed)
    }

    /// Remove a generated beam from a floor
    pub fn delete_beam(&mut self, floor_id: &str, beam_id: &str) -> CalcResult<()> {
        self.floor_mut(floor_id)?.deleted_beams.insert(beam_id.to_string());
        self.commit();
        Ok(())
    }

    pub fn restore_beam(&mut self, floor_id: &str, beam_id: &str) -> CalcResult<()> {
        if !self.floor_mut(floor_id)?.deleted_beams.remove(beam_id) {
            return Err(CalcError::member_not_found("Deleted beam", beam_id));
        }
        self.commit();
        Ok(())
    }

    // ---- slabs ----

    /// Flip a panel between loaded and void; returns the new void state.
    pub fn toggle_void(&mut self, floor_id: &str, panel_id: &str) -> CalcResult<bool> {
        let exists = self
            .analysis()
            .floor(floor_id)
            .is_some_and(|f| f.panel(panel_id).is_some());
        let floor = self.floor_mut(floor_id)?;
        let now_void = if floor.void_panels.remove(panel_id) {
            false
        } else if exists {
            floor.void_panels.insert(panel_id.to_string());
            true
        } else {
            return Err(CalcError::member_not_found("Slab panel", panel_id));
        };
        self.commit();
        Ok(now_void)
    }

    // ---- columns ----

    pub fn set_column_active(&mut self, column_id: &str, active: bool) -> CalcResult<()> {
        self.require_column(column_id)?;
        self.model.column_override_mut(column_id).active = (!active).then_some(false);
        self.prune_override(column_id);
        self.commit();
        Ok(())
    }

    pub fn set_column_floor_active(&mut self, column_id: &str, floor_id: &str, active: bool) -> CalcResult<()> {
        self.require_column(column_id)?;
        if self.model.floor(floor_id).is_none() {
            return Err(CalcError::floor_not_found(floor_id));
        }
        self.model
            .column_override_mut(column_id)
            .floors
            .entry(floor_id.to_string())
            .or_default()
            .active = (!active).then_some(false);
        self.prune_override(column_id);
        self.commit();
        Ok(())
    }

    /// Mark a column as starting on `start_floor` (planted), or clear it
    pub fn set_column_start_floor(&mut self, column_id: &str, start_floor: Option<String>) -> CalcResult<()> {
        self.require_column(column_id)?;
        if let Some(floor_id) = &start_floor {
            if self.model.floor(floor_id).is_none() {
                return Err(CalcError::floor_not_found(floor_id.clone()));
            }
        }
        self.model.column_override_mut(column_id).start_floor = start_floor;
        self.prune_override(column_id);
        self.commit();
        Ok(())
    }

    /// Place a planted column at a plan position and return its id.
    pub fn add_planted_column(&mut self, x: f64, y: f64, start_floor: Option<String>) -> CalcResult<String> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(CalcError::invalid_input("position", format!("({x}, {y})"), "coordinates must be finite"));
        }
        if let Some(floor_id) = &start_floor {
            if self.model.floor(floor_id).is_none() {
                return Err(CalcError::floor_not_found(floor_id.clone()));
            }
        }
        let id = format!("P-{}", short_id());
        self.model.planted_columns.push(PlantedColumn::new(id.clone(), x, y, start_floor));
        self.commit();
        Ok(id)
    }

    pub fn remove_planted_column(&mut self, column_id: &str) -> CalcResult<PlantedColumn> {
        let index = self
            .model
            .planted_columns
            .iter()
            .position(|c| c.id == column_id)
            .ok_or_else(|| CalcError::member_not_found("Planted column", column_id))?;
        let removed = self.model.planted_columns.remove(index);
        self.model.column_overrides.remove(column_id);
        self.commit();
        Ok(removed)
    }

    fn prune_override(&mut self, column_id: &str) {
        if let Some(entry) = self.model.column_overrides.get_mut(column_id) {
            entry.floors.retain(|_, o| !o.is_empty());
            if entry.is_empty() {
                self.model.column_overrides.remove(column_id);
            }
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// First eight hex digits of a fresh v4 uuid
fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}
