//! Update command implementation.
//!
//! The `aw update` command replaces the installed binary with the latest
//! release. `--check` only reports whether a newer release exists.

use std::io::Write;

use anyhow::Context;

use crate::cli::args::UpdateArgs;
use crate::config::{load_update_config, UpdateConfig};
use crate::error::Result;
use crate::updates::{ReqwestTransport, UpdateOutcome, Updater, VERSION};

use super::dispatcher::{Command, CommandResult};

/// The update command implementation.
pub struct UpdateCommand {
    args: UpdateArgs,
}

impl UpdateCommand {
    /// Create a new update command.
    pub fn new(args: UpdateArgs) -> Self {
        Self { args }
    }

    fn updater(&self, config: UpdateConfig) -> Result<Updater> {
        let transport =
            ReqwestTransport::new(config.timeout()).context("Failed to build HTTP client")?;
        let mut updater = Updater::new(Box::new(transport), config, VERSION);
        if let Some(path) = &self.args.exec_path {
            updater = updater.with_exec_path(path);
        }
        Ok(updater)
    }

    /// Run with an already resolved configuration.
    pub fn run(&self, config: UpdateConfig, out: &mut dyn Write) -> Result<CommandResult> {
        let updater = self.updater(config)?;
        tracing::debug!(
            "Updating for {}/{} (exec path override: {:?})",
            updater.platform().os,
            updater.platform().arch,
            updater.exec_path()
        );

        if self.args.check {
            updater.check(out)?;
            return Ok(CommandResult::success());
        }

        match updater.execute(out)? {
            UpdateOutcome::UpToDate(plan) => {
                tracing::debug!("Already on {}", plan.current);
            }
            UpdateOutcome::Updated { plan, path } => {
                tracing::info!("Installed {} at {}", plan.latest, path.display());
            }
        }
        Ok(CommandResult::success())
    }
}

impl Command for UpdateCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let config = load_update_config()?;
        self.run(config, out)
    }
}
