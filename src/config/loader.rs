//! Configuration file discovery and loading.
//!
//! Settings are resolved in priority order (later overrides earlier):
//! 1. Built-in defaults
//! 2. User config (`<config dir>/agent-workspace/config.yml`)
//! 3. Environment variables (`AW_UPDATE_*`)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::schema::{UpdateConfig, UserConfigFile};
use crate::error::{AwError, Result};

/// Overrides the API base URL.
pub const ENV_API_URL: &str = "AW_UPDATE_API_URL";

/// Overrides the `owner/name` repository.
pub const ENV_REPO: &str = "AW_UPDATE_REPO";

/// Overrides the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "AW_UPDATE_TIMEOUT_SECS";

/// Find the user's config at `<config dir>/agent-workspace/config.yml`.
pub fn find_user_config() -> Option<PathBuf> {
    let path = dirs::config_dir()?
        .join("agent-workspace")
        .join("config.yml");
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<UserConfigFile> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Parse YAML content as a user config file.
pub fn parse_config(content: &str, path: &Path) -> Result<UserConfigFile> {
    if content.trim().is_empty() {
        return Ok(UserConfigFile::default());
    }
    serde_yaml::from_str(content).map_err(|e| AwError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply `AW_UPDATE_*` overrides from `vars`.
pub fn apply_env(config: &mut UpdateConfig, vars: &HashMap<String, String>) -> Result<()> {
    if let Some(api_url) = vars.get(ENV_API_URL) {
        config.api_url = api_url.clone();
    }
    if let Some(repo) = vars.get(ENV_REPO) {
        config.repo = repo.clone();
    }
    if let Some(timeout) = vars.get(ENV_TIMEOUT_SECS) {
        config.timeout_secs = timeout
            .trim()
            .parse()
            .map_err(|_| AwError::ConfigValidationError {
                message: format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_TIMEOUT_SECS, timeout
                ),
            })?;
    }
    Ok(())
}

/// Check that resolved settings are usable.
pub fn validate(config: &UpdateConfig) -> Result<()> {
    let mut parts = config.repo.split('/');
    let well_formed = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
    );
    if !well_formed {
        return Err(AwError::ConfigValidationError {
            message: format!("repo must be in owner/name form, got {:?}", config.repo),
        });
    }
    if config.timeout_secs == 0 {
        return Err(AwError::ConfigValidationError {
            message: "timeout_secs must be at least 1".to_string(),
        });
    }
    if config.api_url.trim().is_empty() {
        return Err(AwError::ConfigValidationError {
            message: "api_url must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Resolve settings from defaults, an optional config file and `vars`.
pub fn load_update_config_from(
    path: Option<&Path>,
    vars: &HashMap<String, String>,
) -> Result<UpdateConfig> {
    let mut config = UpdateConfig::default();

    if let Some(path) = path {
        debug!("Loading update settings from {}", path.display());
        let file = load_config_file(path)?;
        config.apply_section(&file.update);
    }

    apply_env(&mut config, vars)?;
    validate(&config)?;
    Ok(config)
}

/// Resolve settings from the user config file and the process environment.
pub fn load_update_config() -> Result<UpdateConfig> {
    let vars: HashMap<String, String> = std::env::vars().collect();
    load_update_config_from(find_user_config().as_deref(), &vars)
}
