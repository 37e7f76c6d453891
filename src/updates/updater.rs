//! Update orchestration.
//!
//! [`Updater`] runs the self-update workflow:
//!
//! ```text
//! CheckingRelease -> ComparingVersions -> UpToDate
//!                                      -> Downloading -> Extracting -> Replacing -> Done
//! ```
//!
//! Any step error ends the run with a [`StepError`]. Download and extraction
//! happen fully in memory, so nothing on disk changes before the final
//! rename performed by [`replace_binary`].

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::archive::extract_binary;
use super::error::{StepContext, StepError, UpdateStep};
use super::release::{
    asset_name, fetch_latest_release, find_asset_url, HttpTransport, Platform, Release,
};
use super::replace::{replace_binary, resolve_executable_path};
use super::version::{parse_version, SemanticVersion};
use crate::config::UpdateConfig;

/// Outcome of comparing the installed version with the latest release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub current: SemanticVersion,
    pub latest: SemanticVersion,
    pub update_needed: bool,
}

/// Terminal state of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The installed version is the latest; nothing was downloaded.
    UpToDate(UpdatePlan),
    /// The binary at `path` now holds the latest release.
    Updated { plan: UpdatePlan, path: PathBuf },
}

impl UpdateOutcome {
    pub fn plan(&self) -> &UpdatePlan {
        match self {
            UpdateOutcome::UpToDate(plan) => plan,
            UpdateOutcome::Updated { plan, .. } => plan,
        }
    }
}

/// Drives the self-update workflow against injected collaborators.
pub struct Updater {
    transport: Box<dyn HttpTransport>,
    config: UpdateConfig,
    current_version: String,
    platform: Platform,
    exec_path: Option<PathBuf>,
}

impl Updater {
    /// Create an updater for the running platform.
    pub fn new(
        transport: Box<dyn HttpTransport>,
        config: UpdateConfig,
        current_version: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            config,
            current_version: current_version.into(),
            platform: Platform::current(),
            exec_path: None,
        }
    }

    /// Select release assets for another platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Replace the file at `path` instead of the running executable.
    pub fn with_exec_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.exec_path = Some(path.into());
        self
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn exec_path(&self) -> Option<&Path> {
        self.exec_path.as_deref()
    }

    /// Compare the installed version with the latest release without
    /// downloading anything.
    pub fn check(&self, out: &mut dyn Write) -> Result<UpdatePlan, StepError> {
        let (_, plan) = self.resolve_plan(out)?;
        if plan.update_needed {
            report(
                out,
                format_args!("Update available: {} -> {}", plan.current, plan.latest),
            );
        } else {
            report_up_to_date(out, &plan);
        }
        Ok(plan)
    }

    /// Run the full workflow, replacing the installed binary when a newer
    /// release exists.
    pub fn execute(&self, out: &mut dyn Write) -> Result<UpdateOutcome, StepError> {
        let (release, plan) = self.resolve_plan(out)?;
        if !plan.update_needed {
            report_up_to_date(out, &plan);
            return Ok(UpdateOutcome::UpToDate(plan));
        }

        report(
            out,
            format_args!("Updating aw: {} -> {}", plan.current, plan.latest),
        );

        let binary = self.config.binary_name.as_str();
        let Platform { os, arch } = &self.platform;

        info!("Selecting release asset for {}/{}", os, arch);
        let asset_url =
            find_asset_url(&release, binary, os, arch).step(UpdateStep::FindingAsset)?;

        report(
            out,
            format_args!(
                "Downloading {} for {}/{}...",
                asset_name(binary, os, arch),
                os,
                arch
            ),
        );
        info!("Downloading {}", asset_url);
        let archive = self
            .transport
            .get(asset_url, None)
            .and_then(|response| response.error_for_status(asset_url))
            .step(UpdateStep::Downloading)?
            .body;
        debug!("Downloaded {} bytes", archive.len());

        report(out, format_args!("Extracting {}...", binary));
        let payload = extract_binary(&archive, binary).step(UpdateStep::Extracting)?;

        report(out, format_args!("Locating installed binary..."));
        let target =
            resolve_executable_path(self.exec_path.as_deref()).step(UpdateStep::ResolvingPath)?;

        report(out, format_args!("Installing to {}...", target.display()));
        info!(
            "Replacing {} with {} bytes from {}",
            target.display(),
            payload.content.len(),
            payload.entry_path.display()
        );
        replace_binary(&target, &payload.content).step(UpdateStep::Replacing)?;

        report(
            out,
            format_args!("Updated successfully! Run 'aw --version' to verify."),
        );
        Ok(UpdateOutcome::Updated { plan, path: target })
    }

    /// Steps 1 and 2: fetch the latest release and compare versions.
    fn resolve_plan(&self, out: &mut dyn Write) -> Result<(Release, UpdatePlan), StepError> {
        report(out, format_args!("Checking for updates..."));
        let url = self.config.latest_release_url();
        info!("Checking latest release at {}", url);
        let release =
            fetch_latest_release(self.transport.as_ref(), &url).step(UpdateStep::CheckingRelease)?;

        let latest = parse_version(release.version()).step(UpdateStep::ComparingVersions)?;
        let current = parse_version(&self.current_version).step(UpdateStep::ComparingVersions)?;
        let plan = UpdatePlan {
            current,
            latest,
            update_needed: latest > current,
        };
        debug!("Update plan: {:?}", plan);
        Ok((release, plan))
    }
}

fn report_up_to_date(out: &mut dyn Write, plan: &UpdatePlan) {
    report(
        out,
        format_args!("aw {} is already the latest version.", plan.current),
    );
}

/// Write one progress line. Progress output is best-effort.
fn report(out: &mut dyn Write, line: std::fmt::Arguments<'_>) {
    let _ = writeln!(out, "{}", line);
}
