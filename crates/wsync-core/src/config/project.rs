//! Project configuration parsed from `wsync.toml`

use std::path::{Path, PathBuf};

use serde::Deserialize;
use wsync_fs::ConfigStore;

use crate::{Error, Result};

fn default_editor_processes() -> Vec<String> {
    vec!["UE4Editor".to_string(), "UnrealEditor".to_string()]
}

/// Required tool versions and repository settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitSection {
    /// Exact VCS client version
    pub version: String,
    /// Exact large-file extension version
    pub lfs_version: String,
    /// Credential manager version, compared with `gcm_version_suffix` appended
    pub gcm_version: String,
    #[serde(default)]
    pub gcm_version_suffix: String,
    /// Installer flavour used in the credential manager download URL
    #[serde(default)]
    pub gcm_download_suffix: String,
    pub expected_branch: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Version-controlled staleness oracle for binaries
    pub checksum_file: PathBuf,
}

impl GitSection {
    /// Credential manager version as the manager reports it.
    pub fn required_gcm_version(&self) -> String {
        format!("{}{}", self.gcm_version, self.gcm_version_suffix)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogSection {
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Engine distribution settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSection {
    /// Engine distribution executable
    pub tool: PathBuf,
    pub user_config: PathBuf,
    pub ci_config: PathBuf,
    pub default_bundle: String,
    pub ci_bundle: String,
    /// Where builds are installed; retirement is skipped without it
    #[serde(default)]
    pub install_dir: Option<PathBuf>,
    /// Default engine repository for version lookups
    #[serde(default)]
    pub repository: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectSection {
    pub uproject: PathBuf,
    /// Only engine versions starting with this are considered "latest"
    #[serde(default)]
    pub engine_base_version: Option<String>,
    pub default_game_ini: PathBuf,
    #[serde(default = "default_editor_processes")]
    pub editor_processes: Vec<String>,
    #[serde(default)]
    pub support_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinariesSection {
    pub tool: PathBuf,
}

/// Build publishing layout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DispatchSection {
    pub config: PathBuf,
    pub stage_dir: PathBuf,
    /// Directory holding the shipped executable
    pub drm: PathBuf,
    /// Thin launcher used when the real executable is too large to wrap
    pub default_executable: String,
    #[serde(default)]
    pub apply_drm: bool,
}

/// The checked-in project configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectConfig {
    pub git: GitSection,
    #[serde(default)]
    pub log: LogSection,
    pub engine: EngineSection,
    pub project: ProjectSection,
    pub binaries: BinariesSection,
    pub dispatch: DispatchSection,
}

impl ProjectConfig {
    /// Load and validate the project config.
    ///
    /// Any failure is reported as [`Error::ConfigInvalid`] naming the file.
    pub fn load(path: &Path) -> Result<Self> {
        ConfigStore::new()
            .load(path)
            .map_err(|source| Error::ConfigInvalid {
                path: path.to_path_buf(),
                source,
            })
    }
}
