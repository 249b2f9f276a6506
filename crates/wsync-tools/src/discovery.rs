//! Locating installed programs on PATH

use std::path::PathBuf;

/// Every executable named `program` reachable through PATH, in PATH order.
pub fn find_all(program: &str) -> Vec<PathBuf> {
    match which::which_all(program) {
        Ok(paths) => paths.collect(),
        Err(e) => {
            tracing::debug!(program, error = %e, "Program not found on PATH");
            Vec::new()
        }
    }
}

/// The first executable named `program` on PATH.
pub fn find(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
