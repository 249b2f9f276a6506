//! Opening URLs and files with the desktop's default handlers

use std::path::Path;

use crate::error::Result;
use crate::process;

/// Capability: hand resources to the desktop environment.
pub trait Launcher {
    fn open_url(&self, url: &str) -> Result<()>;

    fn open_path(&self, path: &Path) -> Result<()>;

    /// Whether files with `extension` (including the dot) have a registered handler.
    fn file_association_ok(&self, extension: &str) -> bool;
}

/// [`Launcher`] using the host's `start`/`open`/`xdg-open`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn open(target: &str) -> Result<()> {
        if cfg!(windows) {
            process::spawn_detached("cmd", &["/c", "start", "", target])
        } else if cfg!(target_os = "macos") {
            process::spawn_detached("open", &[target])
        } else {
            process::spawn_detached("xdg-open", &[target])
        }
    }
}

impl Launcher for SystemLauncher {
    fn open_url(&self, url: &str) -> Result<()> {
        Self::open(url)
    }

    fn open_path(&self, path: &Path) -> Result<()> {
        Self::open(&path.to_string_lossy())
    }

    fn file_association_ok(&self, extension: &str) -> bool {
        if !cfg!(windows) {
            // xdg-open and open fall back to a chooser
            return true;
        }
        match process::run("cmd", &["/c", "assoc", extension], None) {
            Ok(out) => out.success() && out.output.contains('='),
            Err(e) => {
                tracing::debug!(error = %e, "File association query failed");
                false
            }
        }
    }
}
