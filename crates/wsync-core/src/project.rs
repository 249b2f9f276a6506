//! Project files the sync reads and rewrites
//!
//! - the `.uproject` JSON document, whose `EngineAssociation` names the engine build
//! - the default-game ini, whose `ProjectVersion=` line names the project version
//! - the editor's source-control settings ini

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use wsync_fs::io;

use crate::config::{ProjectConfig, UserConfig};
use crate::{Error, Result};

const ENGINE_ASSOCIATION_KEY: &str = "EngineAssociation";
const PROJECT_VERSION_KEY: &str = "ProjectVersion=";

/// The project version binaries are pulled for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMarker {
    pub project_version: String,
    /// The user pinned an older version instead of following HEAD
    pub is_custom_version: bool,
}

impl VersionMarker {
    /// Revision at which the checksum file is read.
    pub fn checksum_revision(&self) -> &str {
        if self.is_custom_version {
            &self.project_version
        } else {
            "HEAD"
        }
    }
}

/// Which part of the project version to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Hotfix,
    Stable,
    Public,
}

impl VersionBump {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hotfix => "hotfix",
            Self::Stable => "stable",
            Self::Public => "public",
        }
    }

    pub fn apply(&self, version: &semver::Version) -> semver::Version {
        match self {
            Self::Hotfix => semver::Version::new(version.major, version.minor, version.patch + 1),
            Self::Stable => semver::Version::new(version.major, version.minor + 1, 0),
            Self::Public => semver::Version::new(version.major + 1, 0, 0),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionBump {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hotfix" => Ok(Self::Hotfix),
            "stable" => Ok(Self::Stable),
            "public" => Ok(Self::Public),
            other => Err(Error::usage(format!("Unknown version bump: {other}"))),
        }
    }
}

/// Resolved locations of the project files of one workspace
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    root: PathBuf,
    uproject: PathBuf,
    default_game_ini: PathBuf,
}

impl ProjectFiles {
    pub fn new(root: &Path, config: &ProjectConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            uproject: root.join(&config.project.uproject),
            default_game_ini: root.join(&config.project.default_game_ini),
        }
    }

    pub fn uproject(&self) -> &Path {
        &self.uproject
    }

    /// The engine version the project file declares.
    pub fn engine_association(&self) -> Result<Option<String>> {
        let document = self.read_uproject()?;
        Ok(document
            .get(ENGINE_ASSOCIATION_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|v| !v.is_empty()))
    }

    /// Declare a new engine version, keeping every other field.
    pub fn set_engine_association(&self, version: &str) -> Result<()> {
        let mut document = self.read_uproject()?;
        let Some(object) = document.as_object_mut() else {
            return Err(Error::EngineVersionUpdate {
                path: self.uproject.clone(),
            });
        };
        object.insert(ENGINE_ASSOCIATION_KEY.to_string(), Value::from(version));

        // The engine writes project files with tab indentation
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut serializer)?;
        buf.push(b'\n');
        io::write_atomic(&self.uproject, &buf)?;
        Ok(())
    }

    fn read_uproject(&self) -> Result<Value> {
        let text = io::read_text(&self.uproject)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// `ProjectVersion=` from the default-game ini.
    pub fn ini_project_version(&self) -> Result<Option<String>> {
        let text = io::read_text(&self.default_game_ini)?;
        Ok(text
            .lines()
            .find_map(|line| line.trim().strip_prefix(PROJECT_VERSION_KEY))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    /// The project version to sync binaries for, honouring a user pin.
    pub fn version_marker(&self, user: &UserConfig) -> Result<VersionMarker> {
        if let Some(pinned) = user.pinned_version() {
            return Ok(VersionMarker {
                project_version: pinned.to_string(),
                is_custom_version: true,
            });
        }
        match self.ini_project_version() {
            Ok(Some(project_version)) => Ok(VersionMarker {
                project_version,
                is_custom_version: false,
            }),
            Ok(None) => Err(Error::ProjectVersionUnavailable),
            Err(e) => {
                tracing::debug!(error = %e, "Reading project version failed");
                Err(Error::ProjectVersionUnavailable)
            }
        }
    }

    /// Bump `ProjectVersion=` in place and return the new version.
    pub fn bump_project_version(&self, bump: VersionBump) -> Result<String> {
        let current = self
            .ini_project_version()?
            .ok_or(Error::ProjectVersionUnavailable)?;
        let parsed = semver::Version::parse(&current).map_err(|_| Error::InvalidProjectVersion {
            version: current.clone(),
        })?;
        let next = bump.apply(&parsed).to_string();

        let text = io::read_text(&self.default_game_ini)?;
        let mut rewritten: Vec<String> = text
            .lines()
            .map(|line| {
                if line.trim().starts_with(PROJECT_VERSION_KEY) {
                    format!("{PROJECT_VERSION_KEY}{next}")
                } else {
                    line.to_string()
                }
            })
            .collect();
        if text.ends_with('\n') {
            rewritten.push(String::new());
        }
        io::write_text(&self.default_game_ini, &rewritten.join("\n"))?;

        tracing::info!(from = %current, to = %next, bump = %bump, "Project version updated");
        Ok(next)
    }

    /// Point the editor's source-control integration at `git_executable`.
    pub fn write_scm_settings(&self, git_executable: &Path) -> Result<PathBuf> {
        let path = self
            .root
            .join("Saved")
            .join("Config")
            .join(format!("{}Editor", editor_platform()))
            .join("SourceControlSettings.ini");
        let content = format!(
            "[SourceControl.SourceControlSettings]\nProvider=Git LFS 2\n\n\
             [GitSourceControl.GitSourceControlSettings]\nBinaryPath={}\n",
            git_executable.display()
        );
        io::write_text(&path, &content)?;
        Ok(path)
    }
}

fn editor_platform() -> &'static str {
    if cfg!(windows) {
        "Windows"
    } else if cfg!(target_os = "macos") {
        "Mac"
    } else {
        "Linux"
    }
}
