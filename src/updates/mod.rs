//! Self-update functionality.
//!
//! This module provides:
//! - Version parsing and comparison
//! - Latest-release lookup and platform asset selection
//! - Binary extraction from `.tar.gz` release archives
//! - Atomic replacement of the installed executable
//! - The [`Updater`] that runs these steps in order

pub mod archive;
pub mod error;
pub mod release;
pub mod replace;
pub mod updater;
pub mod version;

pub use archive::{extract_binary, BinaryPayload};
pub use error::{StepError, UpdateError, UpdateStep};
pub use release::{
    asset_name, fetch_latest_release, find_asset_url, HttpResponse, HttpTransport, Platform,
    Release, ReleaseAsset, ReqwestTransport, GITHUB_JSON,
};
pub use replace::{replace_binary, resolve_executable_path};
pub use updater::{UpdateOutcome, UpdatePlan, Updater};
pub use version::{is_newer, parse_version, SemanticVersion, VERSION};
