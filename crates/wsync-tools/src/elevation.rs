//! Scoped privilege elevation
//!
//! Elevation is requested for exactly one operation (deleting files) and is
//! never retained: the elevated work runs in a separate process while this
//! one continues as the original user.

use std::path::PathBuf;

use crate::error::{Result, ToolError};
use crate::process;

/// Capability: delete files with elevated privileges.
pub trait Elevation {
    /// Whether the current process already runs elevated.
    fn is_elevated(&self) -> bool;

    /// Delete `paths` from an elevated subprocess, prompting the user.
    fn delete_elevated(&self, paths: &[PathBuf]) -> Result<()>;
}

/// Elevation for hosts where shadow binaries are never detected
#[derive(Debug, Clone, Copy, Default)]
pub struct NoElevation;

impl Elevation for NoElevation {
    fn is_elevated(&self) -> bool {
        false
    }

    fn delete_elevated(&self, _paths: &[PathBuf]) -> Result<()> {
        Ok(())
    }
}

/// Elevation through the Windows consent prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct UacElevation;

impl Elevation for UacElevation {
    fn is_elevated(&self) -> bool {
        // `net session` only succeeds from an administrator token
        process::run("net", &["session"], None).is_ok_and(|out| out.success())
    }

    fn delete_elevated(&self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let quoted: Vec<String> = paths
            .iter()
            .map(|p| format!("\"\"{}\"\"", p.display()))
            .collect();
        let command = format!(
            "Start-Process -FilePath cmd.exe -Verb RunAs -Wait -ArgumentList '/c DEL /q /f {}'",
            quoted.join(" ")
        );
        let out = process::run("powershell", &["-NoProfile", "-Command", &command], None)?;
        if out.success() {
            Ok(())
        } else {
            tracing::debug!(output = %out.output.trim(), "Elevated delete refused");
            Err(ToolError::ElevationDeclined)
        }
    }
}

/// The elevation mechanism for the current host.
pub fn system_elevation() -> Box<dyn Elevation> {
    if cfg!(windows) {
        Box::new(UacElevation)
    } else {
        Box::new(NoElevation)
    }
}
