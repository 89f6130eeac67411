//! Error types for hgtdeps operations.
//!
//! This module defines [`HgtError`], the top-level error type used by the
//! CLI and manifest layers, and a [`Result`] type alias for convenience.
//! Per-dependency failures live in [`crate::provision::ProvisionError`]
//! and are aggregated into [`HgtError::ProvisionFailed`].
//!
//! # Error Handling Strategy
//!
//! - Use `HgtError` for errors that abort a whole command
//! - Use `ProvisionError` for errors isolated to one dependency
//! - Use `anyhow::Error` (via `HgtError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hgtdeps operations.
#[derive(Debug, Error)]
pub enum HgtError {
    /// `provision` was called with nothing to do.
    #[error("No dependencies to provision: the dependency list is empty")]
    EmptySpecList,

    /// Manifest file not found at the given location.
    #[error("Manifest not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a manifest file.
    #[error("Failed to parse manifest at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid manifest structure or values.
    #[error("Invalid manifest: {message}")]
    ConfigValidationError { message: String },

    /// One or more dependencies could not be provisioned.
    #[error("Failed to provision: {}", failed.join(", "))]
    ProvisionFailed { failed: Vec<String> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for hgtdeps operations.
pub type Result<T> = std::result::Result<T, HgtError>;
