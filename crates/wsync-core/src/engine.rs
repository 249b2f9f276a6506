//! Engine build lifecycle
//!
//! Registers the engine build the project declares and retires older builds
//! of the same bundle. Retirement never touches the current build, and with a
//! keep count of `k` never removes more than `installed - k` builds.

use std::fmt;

use wsync_tools::{EngineDistribution, InstalledBuild};

use crate::{Error, Result};

/// The engine build a workspace needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineBuildIdentity {
    pub bundle: String,
    pub engine_version: String,
    pub needs_debug_symbols: bool,
}

impl EngineBuildIdentity {
    /// Directory name of this build in the install directory.
    pub fn install_name(&self) -> String {
        wsync_tools::install_name(&self.bundle, &self.engine_version)
    }
}

impl fmt::Display for EngineBuildIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.install_name())?;
        if self.needs_debug_symbols {
            f.write_str(" (with symbols)")?;
        }
        Ok(())
    }
}

/// Pick the builds to retire.
///
/// Only builds of `current`'s bundle are candidates. They are ranked newest
/// first; the `keep` newest and the current build survive. With `keep` of
/// `None` every candidate but the current build goes. The current build is
/// recognised by version, the same way the editor lookup finds it.
pub fn select_retired<'b>(
    installed: &'b [InstalledBuild],
    current: &EngineBuildIdentity,
    keep: Option<usize>,
) -> Vec<&'b InstalledBuild> {
    let mut candidates: Vec<&InstalledBuild> = installed
        .iter()
        .filter(|b| b.is_bundle(&current.bundle))
        .collect();
    candidates.sort_by(|a, b| b.modified.cmp(&a.modified));

    let skip = keep.unwrap_or(0);
    candidates
        .into_iter()
        .skip(skip)
        .filter(|b| !b.is_version(&current.engine_version))
        .collect()
}

/// Registers and retires engine builds
pub struct EngineLifecycleManager<'a> {
    engine: &'a dyn EngineDistribution,
}

impl<'a> EngineLifecycleManager<'a> {
    pub fn new(engine: &'a dyn EngineDistribution) -> Self {
        Self { engine }
    }

    /// Make sure `identity` is installed and registered.
    pub fn register(&self, identity: &EngineBuildIdentity) -> Result<()> {
        tracing::info!(build = %identity, "Registering engine build");
        self.engine
            .register(&identity.bundle, identity.needs_debug_symbols)
            .map_err(|e| {
                tracing::debug!(error = %e, "Engine registration failed");
                Error::EngineRegistration {
                    bundle: identity.bundle.clone(),
                    version: identity.engine_version.clone(),
                }
            })?;
        tracing::info!(build = %identity, "Engine build is registered");
        Ok(())
    }

    /// Remove old builds of `current`'s bundle. Returns how many were removed.
    ///
    /// Every selected build is attempted; failures are collected into one error.
    pub fn retire(&self, current: &EngineBuildIdentity, keep: Option<usize>) -> Result<usize> {
        let installed = self.engine.installed_builds()?;
        let retired = select_retired(&installed, current, keep);
        if retired.is_empty() {
            tracing::debug!(bundle = %current.bundle, "No engine builds to retire");
            return Ok(0);
        }

        let mut failed = Vec::new();
        for build in &retired {
            if let Err(e) = self.engine.remove_build(build) {
                tracing::warn!(build = %build.name, error = %e, "Failed to remove engine build");
                failed.push(build.name.clone());
            }
        }
        if !failed.is_empty() {
            return Err(Error::EngineCleanup { failed });
        }
        tracing::info!(count = retired.len(), "Removed old engine installations");
        Ok(retired.len())
    }
}
