//! Configuration for aw's self-update workflow.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, environment overrides and validation in [`loader`]
//!
//! # Example
//!
//! ```
//! use agent_workspace::config::load_update_config_from;
//! use std::collections::HashMap;
//!
//! let mut env = HashMap::new();
//! env.insert("AW_UPDATE_REPO".to_string(), "acme/aw".to_string());
//!
//! let config = load_update_config_from(None, &env).unwrap();
//! assert_eq!(
//!     config.latest_release_url(),
//!     "https://api.github.com/repos/acme/aw/releases/latest"
//! );
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    apply_env, find_user_config, load_config_file, load_update_config, load_update_config_from,
    parse_config, validate, ENV_API_URL, ENV_REPO, ENV_TIMEOUT_SECS,
};
pub use schema::{UpdateConfig, UpdateSection, UserConfigFile};
