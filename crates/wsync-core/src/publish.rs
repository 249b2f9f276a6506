//! Build publishing
//!
//! Pushes a staged build through the dispatch tool to the internal branch.
//! Playtester publishing is rejected outright. When the shipped executable is
//! too large for the DRM wrapper, the thin launcher three directories above
//! the executable's directory is wrapped instead.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use wsync_tools::DispatchTool;

use crate::config::{DispatchSection, UserDispatch};
use crate::{Error, Result};

/// Largest executable the DRM wrapper accepts (100 MiB)
pub const MAX_WRAPPABLE_EXECUTABLE_SIZE: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchType {
    Internal,
    Playtester,
}

impl BranchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Playtester => "playtester",
        }
    }
}

impl fmt::Display for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BranchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "internal" => Ok(Self::Internal),
            "playtester" => Ok(Self::Playtester),
            other => Err(Error::UnknownBranchType {
                value: other.to_string(),
            }),
        }
    }
}

/// Everything one publish needs, resolved to absolute paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub branch_type: BranchType,
    pub config: PathBuf,
    pub stage_dir: PathBuf,
    /// Directory holding the shipped executable
    pub drm_dir: PathBuf,
    pub default_executable: String,
    pub apply_drm: bool,
}

impl PublishRequest {
    pub fn new(branch_type: BranchType, root: &Path, dispatch: &DispatchSection) -> Self {
        Self {
            branch_type,
            config: root.join(&dispatch.config),
            stage_dir: root.join(&dispatch.stage_dir),
            drm_dir: root.join(&dispatch.drm),
            default_executable: dispatch.default_executable.clone(),
            apply_drm: dispatch.apply_drm,
        }
    }
}

/// The executable in `dir`. With several, the first by name wins.
pub fn locate_executable(dir: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir).map_err(|_| Error::ExecutableNotFound {
        dir: dir.to_path_buf(),
    })?;
    let mut executables: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
        })
        .collect();
    executables.sort();

    if executables.len() > 1 {
        tracing::warn!(dir = %dir.display(), count = executables.len(), "Multiple executables found");
    }
    executables
        .into_iter()
        .next()
        .ok_or_else(|| Error::ExecutableNotFound {
            dir: dir.to_path_buf(),
        })
}

/// The file the DRM wrapper should process.
///
/// Oversized executables are replaced by `default_executable` three levels
/// above `drm_dir`.
pub fn wrap_target(executable: &Path, drm_dir: &Path, default_executable: &str) -> Result<PathBuf> {
    let size = std::fs::metadata(executable)?.len();
    if size <= MAX_WRAPPABLE_EXECUTABLE_SIZE {
        return Ok(executable.to_path_buf());
    }
    let base = match drm_dir.ancestors().nth(3) {
        Some(dir) => dir.to_path_buf(),
        None => drm_dir.join("..").join("..").join(".."),
    };
    let target = base.join(default_executable);
    tracing::info!(
        executable = %executable.display(),
        size,
        target = %target.display(),
        "Executable exceeds the DRM size limit, wrapping the launcher instead"
    );
    Ok(target)
}

/// Publishes staged builds
pub struct BuildPublishDispatcher<'a> {
    tool: &'a dyn DispatchTool,
    ids: &'a UserDispatch,
}

impl<'a> BuildPublishDispatcher<'a> {
    pub fn new(tool: &'a dyn DispatchTool, ids: &'a UserDispatch) -> Self {
        Self { tool, ids }
    }

    /// Publish the staged build. Returns the file selected for DRM wrapping.
    pub fn publish(&self, request: &PublishRequest) -> Result<PathBuf> {
        if request.branch_type == BranchType::Playtester {
            return Err(Error::PlaytesterRejected);
        }

        let app_id = setting(&self.ids.app_id, "dispatch.app_id")?;
        let branch_id = setting(&self.ids.internal_bid, "dispatch.internal_bid")?;

        let executable = locate_executable(&request.drm_dir)?;
        let target = wrap_target(&executable, &request.drm_dir, &request.default_executable)?;
        if request.apply_drm {
            let out = self.tool.drm_wrap(app_id, &target)?;
            if !out.success() {
                tracing::error!(output = %out.output.trim(), "DRM wrap failed");
                return Err(Error::PublishFailed { code: out.code });
            }
            tracing::info!(target = %target.display(), "DRM wrapper applied");
        } else {
            tracing::debug!(target = %target.display(), "DRM wrapping disabled");
        }

        tracing::info!(branch = %request.branch_type, "Pushing build");
        let out = self
            .tool
            .push(branch_id, &request.config, &request.stage_dir)?;
        for line in out.output.lines().filter(|l| !l.trim().is_empty()) {
            tracing::info!("{}", line.trim_end());
        }
        if !out.success() {
            return Err(Error::PublishFailed { code: out.code });
        }
        tracing::info!("New build pushed and published");
        Ok(target)
    }
}

fn setting<'s>(value: &'s Option<String>, key: &str) -> Result<&'s str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::setting_missing(key))
}
