//! Engine build distribution
//!
//! Engine builds are fetched and registered by an external versionator tool.
//! Installed builds live side by side in an install directory as
//! `<bundle>-<version>` folders, which is what retirement enumerates.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{Result, ToolError};
use crate::process::{self, ToolOutput};

/// One engine build present on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledBuild {
    /// Directory name, `<bundle>-<version>`
    pub name: String,
    pub path: PathBuf,
    /// Last modification time, used to order builds by recency
    pub modified: SystemTime,
}

/// Directory name of a build in the install directory.
pub fn install_name(bundle: &str, engine_version: &str) -> String {
    format!("{bundle}-{engine_version}")
}

impl InstalledBuild {
    /// Whether this build belongs to the given bundle class.
    pub fn is_bundle(&self, bundle: &str) -> bool {
        self.name
            .strip_prefix(bundle)
            .is_some_and(|rest| rest.starts_with('-'))
    }

    /// Whether this build carries the given engine version, whatever its bundle.
    pub fn is_version(&self, engine_version: &str) -> bool {
        self.name
            .strip_suffix(engine_version)
            .is_some_and(|rest| rest.ends_with('-'))
    }
}

/// Capability: acquire, enumerate and retire engine builds.
pub trait EngineDistribution {
    /// Register the build for `bundle`, downloading it if absent.
    ///
    /// `symbols` selects the artifact variant that carries debug symbols.
    fn register(&self, bundle: &str, symbols: bool) -> Result<()>;

    /// Engine versions published at `repository`, oldest first.
    fn available_versions(&self, repository: &str) -> Result<Vec<String>>;

    /// Every engine build currently installed.
    fn installed_builds(&self) -> Result<Vec<InstalledBuild>>;

    /// Delete one installed build.
    fn remove_build(&self, build: &InstalledBuild) -> Result<()>;

    /// Fill the derived-data cache for `uproject` using the given engine version.
    fn generate_ddc(&self, uproject: &Path, engine_version: &str) -> Result<()>;
}

/// Editor command-line executables searched for derived-data generation
const EDITOR_CMD_NAMES: &[&str] = &["UnrealEditor-Cmd", "UE4Editor-Cmd"];

/// [`EngineDistribution`] backed by the versionator command-line tool
#[derive(Debug, Clone)]
pub struct VersionatorTool {
    program: PathBuf,
    working_dir: PathBuf,
    config: PathBuf,
    install_dir: Option<PathBuf>,
}

impl VersionatorTool {
    /// `config` is the versionator settings file to pass (user or CI flavour).
    pub fn new(
        program: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        config: impl Into<PathBuf>,
        install_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
            config: config.into(),
            install_dir,
        }
    }

    fn run(&self, args: &[&str]) -> Result<ToolOutput> {
        process::run(&self.program, args, Some(&self.working_dir))
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn editor_cmd(&self, engine_version: &str) -> Result<PathBuf> {
        let builds = self.installed_builds()?;
        let build = builds
            .iter()
            .filter(|b| b.is_version(engine_version))
            .max_by_key(|b| b.modified)
            .ok_or_else(|| ToolError::NotFound {
                what: format!("Engine build {engine_version}"),
            })?;

        let platform = if cfg!(windows) {
            "Win64"
        } else if cfg!(target_os = "macos") {
            "Mac"
        } else {
            "Linux"
        };
        let bin_dir = build.path.join("Engine").join("Binaries").join(platform);

        EDITOR_CMD_NAMES
            .iter()
            .map(|name| bin_dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX)))
            .find(|p| p.is_file())
            .ok_or_else(|| ToolError::NotFound {
                what: format!("Editor command-line executable in {}", bin_dir.display()),
            })
    }
}

impl EngineDistribution for VersionatorTool {
    fn register(&self, bundle: &str, symbols: bool) -> Result<()> {
        let config = self.config.to_string_lossy();
        let mut args = vec!["--assume-valid", "--user-config", &*config, "--bundle", bundle];
        if symbols {
            args.push("--with-symbols");
        }
        let out = self.run(&args)?;
        tracing::debug!(output = %out.output.trim(), "Versionator finished");
        out.into_result(&self.program_name()).map(|_| ())
    }

    fn available_versions(&self, repository: &str) -> Result<Vec<String>> {
        let out = self
            .run(&["--list", "--repository", repository])?
            .into_result(&self.program_name())?;
        Ok(out
            .output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn installed_builds(&self) -> Result<Vec<InstalledBuild>> {
        let Some(dir) = &self.install_dir else {
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut builds = Vec::new();
        let entries = std::fs::read_dir(dir).map_err(|e| ToolError::io(dir, e))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            builds.push(InstalledBuild {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                modified,
            });
        }
        builds.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(builds)
    }

    fn remove_build(&self, build: &InstalledBuild) -> Result<()> {
        tracing::info!(build = %build.name, "Removing engine installation");
        std::fs::remove_dir_all(&build.path).map_err(|e| ToolError::io(&build.path, e))
    }

    fn generate_ddc(&self, uproject: &Path, engine_version: &str) -> Result<()> {
        let editor = self.editor_cmd(engine_version)?;
        let uproject = uproject.to_string_lossy();
        let out = process::run(
            &editor,
            &[&*uproject, "-run=DerivedDataCache", "-fill"],
            Some(&self.working_dir),
        )?;
        out.into_result(&editor.to_string_lossy()).map(|_| ())
    }
}
