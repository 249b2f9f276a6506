//! Per-developer settings from `.wsync/user.toml`

use std::path::Path;

use serde::Deserialize;
use wsync_fs::{ConfigStore, WorkspacePath};

use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserProject {
    /// Pull when not on the expected branch
    #[serde(default)]
    pub autosync: bool,
    /// Pin an older project version for binaries
    #[serde(default)]
    pub version: Option<String>,
    /// Fetch engine builds with debug symbols
    #[serde(default)]
    pub symbols: bool,
}

/// Publishing identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserDispatch {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub internal_bid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub project: UserProject,
    #[serde(default)]
    pub dispatch: UserDispatch,
}

impl UserConfig {
    /// Load the user config of the workspace at `root`. A missing file means defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = WorkspacePath::UserConfig.under(root);
        Ok(ConfigStore::new().load_optional(&path)?.unwrap_or_default())
    }

    /// The pinned project version, ignoring blank values.
    pub fn pinned_version(&self) -> Option<&str> {
        self.project
            .version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}
