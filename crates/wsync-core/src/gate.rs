//! Tool version gate
//!
//! The workflow only runs against exactly the VCS client, large-file extension
//! and credential manager versions the project pins. The gate inspects all
//! three before any repository mutation and reports every mismatch at once.
//!
//! On Windows the VCS installer may ship its own copy of the large-file
//! extension inside its install tree, silently overriding the one the user
//! installed. Those shadow binaries are removed (with elevation when needed).

use std::path::{Path, PathBuf};

use wsync_git::{CredentialHelper, VersionControl};
use wsync_tools::{Elevation, Launcher};

use crate::config::GitSection;
use crate::{Error, Result};

/// Shadow copies of the large-file extension, relative to a VCS install root
pub const SHADOW_LFS_PATHS: &[&str] = &[
    "cmd/git-lfs.exe",
    "mingw64/bin/git-lfs.exe",
    "mingw64/libexec/git-core/git-lfs.exe",
];

/// One tool's version check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequirement {
    pub name: &'static str,
    pub installed_version: Option<String>,
    pub required_version: String,
    /// Where to get the required version
    pub remediation_hint: String,
}

impl ToolRequirement {
    /// Satisfied only by an exact version match.
    pub fn is_satisfied(&self) -> bool {
        self.installed_version.as_deref() == Some(self.required_version.as_str())
    }
}

/// Outcome of a gate check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateReport {
    pub requirements: Vec<ToolRequirement>,
}

impl GateReport {
    pub fn unmet(&self) -> impl Iterator<Item = &ToolRequirement> {
        self.requirements.iter().filter(|r| !r.is_satisfied())
    }

    /// Convert unmet requirements into the blocking error.
    pub fn into_result(self) -> Result<()> {
        let tools: Vec<String> = self.unmet().map(|r| r.name.to_string()).collect();
        if tools.is_empty() {
            Ok(())
        } else {
            Err(Error::ToolVersions { tools })
        }
    }
}

/// Download page for the VCS client installer.
pub fn git_download_url(version: &str) -> String {
    format!("https://github.com/microsoft/git/releases/download/v{version}/Git-{version}-64-bit.exe")
}

/// Download page for the large-file extension installer.
pub fn lfs_download_url(version: &str) -> String {
    format!(
        "https://github.com/git-lfs/git-lfs/releases/download/v{version}/git-lfs-windows-v{version}.exe"
    )
}

/// Download page for the credential manager installer.
pub fn gcm_download_url(version: &str, version_suffix: &str, download_suffix: &str) -> String {
    format!(
        "https://github.com/microsoft/Git-Credential-Manager-Core/releases/download/v{version}{version_suffix}/gcmcore-{download_suffix}-{version}.exe"
    )
}

/// Verifies installed tool versions against the project's requirements
pub struct ToolVersionGate<'a> {
    git: &'a GitSection,
    vcs: &'a dyn VersionControl,
    launcher: &'a dyn Launcher,
    open_downloads: bool,
}

impl<'a> ToolVersionGate<'a> {
    pub fn new(git: &'a GitSection, vcs: &'a dyn VersionControl, launcher: &'a dyn Launcher) -> Self {
        Self {
            git,
            vcs,
            launcher,
            open_downloads: cfg!(windows),
        }
    }

    /// Whether to open download pages for unmet requirements.
    pub fn open_downloads(mut self, open: bool) -> Self {
        self.open_downloads = open;
        self
    }

    /// Inspect all three tools. Never mutates the repository.
    pub fn check(&self) -> Result<GateReport> {
        let client = ToolRequirement {
            name: "Git",
            installed_version: self.vcs.client_version()?,
            required_version: self.git.version.clone(),
            remediation_hint: git_download_url(&self.git.version),
        };
        let lfs = ToolRequirement {
            name: "Git LFS",
            installed_version: self.vcs.lfs_version()?,
            required_version: self.git.lfs_version.clone(),
            remediation_hint: lfs_download_url(&self.git.lfs_version),
        };
        let gcm = ToolRequirement {
            name: "Git Credential Manager",
            installed_version: self.credential_manager_version()?,
            required_version: self.git.required_gcm_version(),
            remediation_hint: gcm_download_url(
                &self.git.gcm_version,
                &self.git.gcm_version_suffix,
                &self.git.gcm_download_suffix,
            ),
        };

        let report = GateReport {
            requirements: vec![client, lfs, gcm],
        };
        for requirement in &report.requirements {
            self.report(requirement);
        }
        Ok(report)
    }

    fn credential_manager_version(&self) -> Result<Option<String>> {
        match self.vcs.credential_helper()? {
            CredentialHelper::Manager(version) => Ok(Some(version)),
            CredentialHelper::Missing => Ok(None),
            CredentialHelper::Foreign(location) => {
                tracing::error!(
                    helper = %location,
                    "Git is currently using a credential helper other than Git Credential Manager"
                );
                if location.to_ascii_lowercase().contains(".exe") {
                    tracing::error!(
                        "Please uninstall the credential helper at {location} and run the sync again"
                    );
                } else {
                    tracing::error!("Please remove the {location} credential helper from your git config");
                }
                if let Err(e) = self.vcs.unset_credential_helpers() {
                    tracing::warn!(error = %e, "Failed to unset credential.helper");
                }
                Ok(None)
            }
        }
    }

    fn report(&self, requirement: &ToolRequirement) {
        if requirement.is_satisfied() {
            tracing::info!(
                tool = requirement.name,
                version = %requirement.required_version,
                "Current version is supported"
            );
            return;
        }

        match &requirement.installed_version {
            Some(installed) => tracing::error!(
                tool = requirement.name,
                installed = %installed,
                required = %requirement.required_version,
                "Installed version does not match the supported version"
            ),
            None => tracing::error!(
                tool = requirement.name,
                required = %requirement.required_version,
                "Not installed or not detected"
            ),
        }
        tracing::error!(
            "Please install {} {} from {}",
            requirement.name,
            requirement.required_version,
            requirement.remediation_hint
        );

        if self.open_downloads
            && let Err(e) = self.launcher.open_url(&requirement.remediation_hint)
        {
            tracing::debug!(error = %e, "Could not open download page");
        }
    }
}

/// Install roots of a VCS client given the client executables found on PATH.
///
/// Only executables inside a `cmd` directory belong to an installer tree;
/// the root sits two levels above the executable.
pub fn vcs_install_roots(executables: &[PathBuf]) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for exe in executables {
        let in_cmd = exe
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|dir| dir.eq_ignore_ascii_case("cmd"));
        if !in_cmd {
            continue;
        }
        if let Some(root) = exe.ancestors().nth(2)
            && !roots.iter().any(|r| r == root)
        {
            roots.push(root.to_path_buf());
        }
    }
    roots
}

/// Shadow large-file extension binaries present under `roots`.
pub fn find_shadow_binaries(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots
        .iter()
        .flat_map(|root| SHADOW_LFS_PATHS.iter().map(move |rel| root.join(rel)))
        .filter(|p| p.is_file())
        .collect()
}

/// Remove shadow binaries, elevating once when the process lacks privileges.
///
/// Fails with [`Error::ShadowBinary`] listing every copy still present afterwards.
pub fn remove_shadow_binaries(paths: &[PathBuf], elevation: &dyn Elevation) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    for path in paths {
        tracing::info!(path = %path.display(), "Removing shadow Git LFS binary");
    }

    if elevation.is_elevated() {
        for path in paths {
            if let Err(e) = wsync_fs::io::remove_if_exists(path) {
                tracing::error!(error = %e, "Failed to remove shadow binary");
            }
        }
    } else {
        tracing::warn!("Administrator rights are required to remove shadow binaries; requesting elevation");
        if let Err(e) = elevation.delete_elevated(paths) {
            tracing::error!(error = %e, "Elevated removal failed");
        }
    }

    let remaining: Vec<PathBuf> = paths.iter().filter(|p| p.exists()).cloned().collect();
    if remaining.is_empty() {
        Ok(())
    } else {
        Err(Error::ShadowBinary { paths: remaining })
    }
}
