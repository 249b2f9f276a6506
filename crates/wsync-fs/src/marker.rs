//! Persisted error marker
//!
//! A blocking failure leaves `.wsync_error` in the workspace root. While the
//! file exists every run refuses to proceed; the operator removes it once the
//! workspace has been repaired.

use std::path::{Path, PathBuf};

use crate::{Result, WorkspacePath, io};

/// Handle to the error marker of one workspace
#[derive(Debug, Clone)]
pub struct ErrorMarker {
    path: PathBuf,
}

impl ErrorMarker {
    /// Marker for the workspace rooted at `root`.
    pub fn at(root: &Path) -> Self {
        Self {
            path: WorkspacePath::ErrorMarker.under(root),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_present(&self) -> bool {
        self.path.exists()
    }

    /// Record a blocking failure. The message is kept for the operator.
    pub fn set(&self, message: &str) -> Result<()> {
        tracing::debug!(path = ?self.path, "Writing error marker");
        io::write_text(&self.path, message)
    }

    /// Remove the marker. Returns whether a marker was present.
    pub fn clear(&self) -> Result<bool> {
        io::remove_if_exists(&self.path)
    }
}
