//! agent-workspace (`aw`) - launcher for AI coding agents in isolated
//! workspaces.
//!
//! This crate holds aw's self-update subsystem and the CLI around it.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Update settings from defaults, config file and environment
//! - [`error`] - Error types and result aliases
//! - [`updates`] - Release lookup, archive extraction and binary replacement
//!
//! # Example
//!
//! ```
//! use agent_workspace::updates::{find_asset_url, is_newer, Release, ReleaseAsset};
//!
//! assert!(is_newer("v1.3.0", "1.2.9").unwrap());
//!
//! let release = Release {
//!     tag_name: "v1.3.0".to_string(),
//!     assets: vec![ReleaseAsset {
//!         name: "aw_linux_amd64.tar.gz".to_string(),
//!         browser_download_url: "https://example.com/aw_linux_amd64.tar.gz".to_string(),
//!     }],
//! };
//! let url = find_asset_url(&release, "aw", "linux", "amd64").unwrap();
//! assert_eq!(url, "https://example.com/aw_linux_amd64.tar.gz");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod updates;

pub use error::{AwError, Result};
