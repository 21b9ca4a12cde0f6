//! # Error Types
//!
//! Structured error types for loadpath_core.
//!
//! The analysis pipeline itself never fails: malformed model data is clamped
//! and reported through [`crate::calculations::Diagnostic`]. Errors only arise
//! at the edges - reading a model file, or project commands that
//! name a floor, beam or column that does not exist.
//!
//! ## Example
//!
//! ```rust
//! use loadpath_core::errors::{CalcError, CalcResult};
//!
//! fn require_floor(ids: &[&str], id: &str) -> CalcResult<()> {
//!     if !ids.contains(&id) {
//!         return Err(CalcError::floor_not_found(id));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_floor(&["L1"], "L2").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for loadpath_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for project commands and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid for a command (not for the pipeline, which clamps)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A command referenced a floor id that is not in the model
    #[error("Floor not found: {floor_id}")]
    FloorNotFound { floor_id: String },

    /// A command referenced a member (beam or column) id that is not in the model
    #[error("{member} not found: {id}")]
    MemberNotFound { member: String, id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FloorNotFound error
    pub fn floor_not_found(floor_id: impl Into<String>) -> Self {
        CalcError::FloorNotFound {
            floor_id: floor_id.into(),
        }
    }

    /// Create a MemberNotFound error
    pub fn member_not_found(member: impl Into<String>, id: impl Into<String>) -> Self {
        CalcError::MemberNotFound {
            member: member.into(),
            id: id.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., the file can be fixed and re-read)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileError { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::FloorNotFound { .. } => "FLOOR_NOT_FOUND",
            CalcError::MemberNotFound { .. } => "MEMBER_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}
