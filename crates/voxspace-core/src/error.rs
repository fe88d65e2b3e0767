//! Error types for resampling and spacing estimation.
//!
//! Every fallible operation in voxspace returns [`VoxspaceError`], carrying enough
//! context (path, rejected value, expected dimensionality) to diagnose a failure
//! without re-running the call.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for voxspace operations.
#[derive(Error, Debug)]
pub enum VoxspaceError {
    /// An argument was outside its accepted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image or cohort dimensionality does not match what the operation requires.
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: usize,
        context: String,
    },

    /// A referenced file does not exist.
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A referenced file exists but could not be read or decoded.
    #[error("Failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Image geometry cannot be used for index/physical mapping.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Tensor data could not be extracted or converted.
    #[error("Tensor error: {0}")]
    Tensor(String),
}

/// Result type for voxspace operations.
pub type Result<T> = std::result::Result<T, VoxspaceError>;

impl VoxspaceError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(
        expected: impl Into<String>,
        actual: usize,
        context: impl Into<String>,
    ) -> Self {
        Self::DimensionMismatch {
            expected: expected.into(),
            actual,
            context: context.into(),
        }
    }

    /// Create a not-found error for `path`.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a read error for `path`.
    pub fn io(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Create a tensor error.
    pub fn tensor(msg: impl Into<String>) -> Self {
        Self::Tensor(msg.into())
    }
}
