//! Binary artifact store
//!
//! Prebuilt binaries are pulled for a specific project version by an
//! external tool. Its exit code is the whole contract:
//!
//! - `0`: binaries are in place
//! - `< 0`: the user must act first (e.g. missing entitlement); the tool
//!   has already printed instructions
//! - `> 0`: unexpected failure

use std::path::PathBuf;

use crate::error::Result;
use crate::process;

/// Capability: pull binary artifacts for a project version.
pub trait BinaryStore {
    /// Pull (and extract) binaries for `version`. `force` re-downloads even
    /// when the local copy looks current. Returns the raw result code.
    fn pull(&self, version: &str, force: bool) -> Result<i32>;
}

/// [`BinaryStore`] backed by the binaries command-line tool
#[derive(Debug, Clone)]
pub struct BinariesTool {
    program: PathBuf,
    working_dir: PathBuf,
}

impl BinariesTool {
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }
}

impl BinaryStore for BinariesTool {
    fn pull(&self, version: &str, force: bool) -> Result<i32> {
        let mut args = vec!["pull", "--version", version];
        if force {
            args.push("--force");
        }
        let out = process::run(&self.program, &args, Some(&self.working_dir))?;
        for line in out.output.lines().filter(|l| !l.trim().is_empty()) {
            tracing::info!("{}", line.trim_end());
        }
        Ok(signed_exit_code(out.code))
    }
}

/// Recover a negative result code from a platform exit status.
///
/// Unix truncates exit statuses to one byte, so a tool returning `-1`
/// surfaces as `255`.
fn signed_exit_code(code: i32) -> i32 {
    if cfg!(unix) && (128..=255).contains(&code) {
        code - 256
    } else {
        code
    }
}
