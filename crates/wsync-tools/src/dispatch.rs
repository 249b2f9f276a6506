//! Build publishing tool

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::process::{self, ToolOutput};

/// Capability: push builds through the external publishing tool.
pub trait DispatchTool {
    /// Push the staged build described by `config` to `branch_id` and publish it.
    fn push(&self, branch_id: &str, config: &Path, stage_dir: &Path) -> Result<ToolOutput>;

    /// Wrap `executable` with the store DRM for `app_id`.
    fn drm_wrap(&self, app_id: &str, executable: &Path) -> Result<ToolOutput>;
}

/// [`DispatchTool`] backed by the dispatch executable given on the command line
#[derive(Debug, Clone)]
pub struct DispatchCli {
    program: PathBuf,
}

impl DispatchCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DispatchTool for DispatchCli {
    fn push(&self, branch_id: &str, config: &Path, stage_dir: &Path) -> Result<ToolOutput> {
        process::run(
            &self.program,
            &[
                OsStr::new("build"),
                OsStr::new("push"),
                OsStr::new(branch_id),
                config.as_os_str(),
                stage_dir.as_os_str(),
                OsStr::new("-p"),
            ],
            None,
        )
    }

    fn drm_wrap(&self, app_id: &str, executable: &Path) -> Result<ToolOutput> {
        process::run(
            &self.program,
            &[
                OsStr::new("build"),
                OsStr::new("drm-wrap"),
                OsStr::new(app_id),
                executable.as_os_str(),
            ],
            None,
        )
    }
}
