//! # Error Types
//!
//! Structured error types for eurocode_core. Configuration mistakes (duplicate
//! load names, removing a load that is not there, unknown enum text) are
//! reported synchronously at the call site. Combination generation itself
//! never fails.
//!
//! ## Example
//!
//! ```rust
//! use eurocode_core::errors::{CalcError, CalcResult};
//!
//! fn validate_psi(psi0: f64) -> CalcResult<()> {
//!     if !(0.0..=1.0).contains(&psi0) {
//!         return Err(CalcError::invalid_input("psi0", psi0.to_string(), "psi0 must lie in [0, 1]"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_psi(0.7).is_ok());
//! assert_eq!(validate_psi(1.3).unwrap_err().error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for eurocode_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for load and combination operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (blank name, negative tolerance, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A load with the same name is already in the collection
    #[error("A load with name '{name}' already exists")]
    DuplicateName { name: String },

    /// No load with this name in the collection
    #[error("No load found with name '{name}'")]
    LoadNotFound { name: String },

    /// Text that does not name any variant of a closed enumeration
    #[error("Invalid {kind}: '{value}'")]
    UnknownVariant { kind: String, value: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
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

    /// Create a DuplicateName error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        CalcError::DuplicateName { name: name.into() }
    }

    /// Create a LoadNotFound error
    pub fn load_not_found(name: impl Into<String>) -> Self {
        CalcError::LoadNotFound { name: name.into() }
    }

    /// Create an UnknownVariant error
    pub fn unknown_variant(kind: impl Into<String>, value: impl Into<String>) -> Self {
        CalcError::UnknownVariant {
            kind: kind.into(),
            value: value.into(),
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

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from anything printable
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::DuplicateName { .. } => "DUPLICATE_NAME",
            CalcError::LoadNotFound { .. } => "LOAD_NOT_FOUND",
            CalcError::UnknownVariant { .. } => "UNKNOWN_VARIANT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
