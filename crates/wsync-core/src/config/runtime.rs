//! Facts about the current invocation

use std::path::PathBuf;

use super::ProjectConfig;

/// Invocation context shared by every component of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeContext {
    /// Workspace root; relative config paths resolve against it
    pub root: PathBuf,
    /// Running unattended under CI
    pub is_ci: bool,
    /// Primary development line, after any debug override
    pub expected_branch: String,
}

impl RuntimeContext {
    pub fn new(root: impl Into<PathBuf>, is_ci: bool, expected_branch: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            is_ci,
            expected_branch: expected_branch.into(),
        }
    }

    /// Build the context from the environment.
    ///
    /// `branch_override` replaces the configured expected branch.
    pub fn from_env(
        root: impl Into<PathBuf>,
        config: &ProjectConfig,
        branch_override: Option<&str>,
    ) -> Self {
        let is_ci = is_ci_value(std::env::var("CI").ok().as_deref());
        let expected = branch_override.unwrap_or(&config.git.expected_branch);
        if branch_override.is_some() {
            tracing::info!(branch = expected, "Expected branch overridden for debugging");
        }
        Self::new(root, is_ci, expected)
    }
}

/// Interpret the value of the `CI` environment variable.
pub fn is_ci_value(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) => !(v.eq_ignore_ascii_case("false") || v == "0"),
    }
}
