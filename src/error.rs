//! Error types for aw operations.
//!
//! This module defines [`AwError`], the error type returned by commands,
//! and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Update failures arrive as [`StepError`], already labelled with the step
//!   that failed
//! - Configuration problems carry the file or variable at fault
//! - Use `anyhow::Error` (via `AwError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::updates::StepError;

/// Core error type for aw operations.
#[derive(Debug, Error)]
pub enum AwError {
    /// The self-update workflow failed.
    #[error(transparent)]
    Update(#[from] StepError),

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for aw operations.
pub type Result<T> = std::result::Result<T, AwError>;
