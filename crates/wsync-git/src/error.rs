//! Error types for wsync-git

/// Result type for wsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wsync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Tool(#[from] wsync_tools::ToolError),

    #[error("`git {command}` failed (exit code {code}): {output}")]
    CommandFailed {
        command: String,
        code: i32,
        output: String,
    },

    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    #[error("Pull of '{branch}' hit conflicts with your local commits")]
    PullConflict { branch: String },
}
