//! Engine editor process detection
//!
//! Mutating the working tree while the editor runs fights its file locks, so
//! the editor is closed before rebases and workspace wipes.

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};

use crate::error::Result;

/// Capability: observe and close running editor instances.
pub trait EditorProcess {
    fn is_running(&self) -> bool;

    /// Terminate every running instance. Returns how many were signalled.
    fn close_all(&self) -> Result<usize>;
}

/// [`EditorProcess`] that scans the host process table
#[derive(Debug, Clone)]
pub struct SystemEditor {
    names: Vec<String>,
}

impl SystemEditor {
    /// `names` are process name prefixes, e.g. `UE4Editor`.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    fn matches(&self, process_name: &str) -> bool {
        self.names.iter().any(|n| process_name.starts_with(n.as_str()))
    }

    fn snapshot() -> System {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing()),
        );
        system.refresh_processes(ProcessesToUpdate::All, true);
        system
    }
}

impl EditorProcess for SystemEditor {
    fn is_running(&self) -> bool {
        Self::snapshot()
            .processes()
            .values()
            .any(|p| self.matches(&p.name().to_string_lossy()))
    }

    fn close_all(&self) -> Result<usize> {
        let system = Self::snapshot();
        let mut closed = 0;
        for process in system.processes().values() {
            let name = process.name().to_string_lossy();
            if !self.matches(&name) {
                continue;
            }
            if process.kill() {
                tracing::info!(pid = %process.pid(), name = %name, "Closed editor process");
                closed += 1;
            } else {
                tracing::warn!(pid = %process.pid(), name = %name, "Failed to close editor process");
            }
        }
        Ok(closed)
    }
}
