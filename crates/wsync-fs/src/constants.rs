//! Well-known paths inside a synchronized workspace.

use std::path::{Path, PathBuf};

/// Files and directories wsync owns inside the workspace root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspacePath {
    /// The `.wsync` state directory
    StateDir,
    /// Per-developer settings, never committed
    UserConfig,
    /// Digest of the checksum file as of the last successful binaries pull
    BinariesChecksumCache,
    /// Sentinel left behind by a blocking failure
    ErrorMarker,
}

impl WorkspacePath {
    /// Get the path relative to the workspace root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateDir => ".wsync",
            Self::UserConfig => ".wsync/user.toml",
            Self::BinariesChecksumCache => ".wsync/binaries.checksum",
            Self::ErrorMarker => ".wsync_error",
        }
    }

    /// Resolve against a workspace root.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(self.as_str())
    }
}

impl AsRef<Path> for WorkspacePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for WorkspacePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
