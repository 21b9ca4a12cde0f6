//! # Model Files
//!
//! Reads a [`BuildingModel`] from a JSON file. The core has no file format of
//! its own; this is the plain serde form of the input record, as handed over
//! by whatever tool produced it.
//!
//! ```rust,no_run
//! use loadpath_core::file_io::load_model;
//! use std::path::Path;
//!
//! let model = load_model(Path::new("tower.json"))?;
//! println!("{} floors", model.floors.len());
//! # Ok::<(), loadpath_core::errors::CalcError>(())
//! ```

use std::fs;
use std::path::Path;

use crate::errors::{CalcError, CalcResult};
use crate::model::BuildingModel;

/// Load a building model from a JSON file.
///
/// Fails with `FILE_ERROR` when the file cannot be read and
/// `SERIALIZATION_ERROR` when it is not a building model.
pub fn load_model(path: &Path) -> CalcResult<BuildingModel> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    let model: BuildingModel = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid model file {}: {}", path.display(), e),
    })?;
    tracing::info!(path = %path.display(), floors = model.floors.len(), "model loaded");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calibration_model;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("loadpath_test_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_load_model_from_json() {
        let path = temp_path("model");
        fs::write(&path, serde_json::to_string_pretty(&calibration_model()).unwrap()).unwrap();
        let model = load_model(&path).unwrap();
        assert_eq!(model, calibration_model());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let path = temp_path("garbage");
        fs::write(&path, "{ not json").unwrap();
        let err = load_model(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = load_model(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(err.is_recoverable());
    }
}
