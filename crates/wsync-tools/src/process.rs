//! Blocking subprocess execution
//!
//! Tools are run to completion with stdout and stderr captured together.
//! A non-zero exit is not an error at this layer: exit code semantics are
//! tool-specific and interpreted by each caller.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, ToolError};

/// Captured result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, or -1 when the process was killed by a signal
    pub code: i32,
    /// Stdout followed by stderr
    pub output: String,
}

impl ToolOutput {
    pub fn new(code: i32, output: impl Into<String>) -> Self {
        Self {
            code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Whether the output mentions any of the given needles.
    pub fn contains_any(&self, needles: &[&str]) -> bool {
        contains_any(&self.output, needles)
    }

    /// Convert a failed invocation into a [`ToolError::Failed`].
    pub fn into_result(self, program: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ToolError::Failed {
                program: program.to_string(),
                code: self.code,
                output: self.output.trim().to_string(),
            })
        }
    }
}

/// Whether `text` contains any of the given needles.
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Run a program to completion, capturing combined output.
pub fn run<S: AsRef<OsStr>>(
    program: impl AsRef<OsStr>,
    args: &[S],
    working_dir: Option<&Path>,
) -> Result<ToolOutput> {
    let program = program.as_ref();
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    tracing::debug!(
        program = %program.to_string_lossy(),
        args = ?args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()).collect::<Vec<_>>(),
        "Running tool"
    );

    let output = cmd.output().map_err(|source| ToolError::Spawn {
        program: program.to_string_lossy().into_owned(),
        source,
    })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(ToolOutput {
        code: output.status.code().unwrap_or(-1),
        output: combined,
    })
}

/// Start a program without waiting for it.
pub fn spawn_detached<S: AsRef<OsStr>>(program: impl AsRef<OsStr>, args: &[S]) -> Result<()> {
    let program = program.as_ref();
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ToolError::Spawn {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;
    Ok(())
}
