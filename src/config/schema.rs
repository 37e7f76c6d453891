//! Configuration schema for the `update` section.
//!
//! The user config file is shared with profile definitions; only the
//! `update:` key is read here and everything else is ignored.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default `owner/name` repository that publishes releases.
pub const DEFAULT_REPO: &str = "hiragram/agent-workspace";

/// Name of the executable inside release archives.
pub const DEFAULT_BINARY_NAME: &str = "aw";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level view of the user config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConfigFile {
    #[serde(default)]
    pub update: UpdateSection,
}

/// `update:` section as written in YAML. Unset keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSection {
    /// API base URL (e.g. a GitHub Enterprise host).
    pub api_url: Option<String>,

    /// Repository in `owner/name` form.
    pub repo: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Resolved settings for the self-update workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConfig {
    /// API base URL without trailing slash.
    pub api_url: String,

    /// Repository in `owner/name` form.
    pub repo: String,

    /// Executable name used for asset names and archive lookup.
    pub binary_name: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            repo: DEFAULT_REPO.to_string(),
            binary_name: DEFAULT_BINARY_NAME.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UpdateConfig {
    /// URL of the "latest release" metadata endpoint.
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/releases/latest",
            self.api_url.trim_end_matches('/'),
            self.repo
        )
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Overlay values set in a config file section.
    pub fn apply_section(&mut self, section: &UpdateSection) {
        if let Some(api_url) = &section.api_url {
            self.api_url = api_url.clone();
        }
        if let Some(repo) = &section.repo {
            self.repo = repo.clone();
        }
        if let Some(timeout) = section.timeout_secs {
            self.timeout_secs = timeout;
        }
    }
}
