//! Error types for the self-update workflow.
//!
//! [`UpdateError`] describes what went wrong inside a single component.
//! [`StepError`] pairs it with the [`UpdateStep`] that was running, which is
//! what operators see on the command line.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by one of the update components.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// A version string was not `X.Y.Z` (with optional `v` prefix).
    #[error("invalid version format {input:?}: {reason}")]
    InvalidFormat { input: String, reason: String },

    /// The transport could not complete the request.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned status {status}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// Release metadata was not valid JSON of the expected shape.
    #[error("parsing release info: {0}")]
    Decode(#[from] serde_json::Error),

    /// No release asset matches the requested platform.
    #[error("no release asset found for {os}/{arch}")]
    AssetNotFound { os: String, arch: String },

    /// The archive is not valid gzip.
    #[error("opening gzip: {0}")]
    Gzip(#[source] std::io::Error),

    /// The decompressed stream is not a valid tar archive.
    #[error("reading tar: {0}")]
    Tar(#[source] std::io::Error),

    /// The archive holds no entry with the expected binary name.
    #[error("binary {name:?} not found in archive")]
    NotFound { name: String },

    /// A filesystem operation on the install directory failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The running executable's path could not be determined.
    #[error("resolving executable path: {0}")]
    Os(#[source] std::io::Error),
}

impl UpdateError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        UpdateError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Phase of the update workflow, used to label errors and progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStep {
    CheckingRelease,
    ComparingVersions,
    FindingAsset,
    Downloading,
    Extracting,
    ResolvingPath,
    Replacing,
}

impl UpdateStep {
    /// Human-readable step name.
    pub fn describe(&self) -> &'static str {
        match self {
            UpdateStep::CheckingRelease => "checking latest release",
            UpdateStep::ComparingVersions => "comparing versions",
            UpdateStep::FindingAsset => "finding release asset",
            UpdateStep::Downloading => "downloading release",
            UpdateStep::Extracting => "extracting binary",
            UpdateStep::ResolvingPath => "determining executable path",
            UpdateStep::Replacing => "replacing binary",
        }
    }
}

impl fmt::Display for UpdateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// An [`UpdateError`] tagged with the step that produced it.
#[derive(Debug, Error)]
#[error("{step}: {source}")]
pub struct StepError {
    pub step: UpdateStep,
    #[source]
    pub source: UpdateError,
}

impl StepError {
    pub fn new(step: UpdateStep, source: UpdateError) -> Self {
        Self { step, source }
    }
}

/// Extension for tagging component results with their step.
pub(crate) trait StepContext<T> {
    fn step(self, step: UpdateStep) -> Result<T, StepError>;
}

impl<T> StepContext<T> for Result<T, UpdateError> {
    fn step(self, step: UpdateStep) -> Result<T, StepError> {
        self.map_err(|source| StepError::new(step, source))
    }
}
