//! Error types for external tool operations

use std::path::PathBuf;

/// Errors that can occur while driving external tools
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The program could not be started at all
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while inspecting or changing tool state on disk
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported failure
    #[error("'{program}' failed (exit code {code}): {output}")]
    Failed {
        program: String,
        code: i32,
        output: String,
    },

    /// The user refused an elevation prompt
    #[error("Elevation was declined")]
    ElevationDeclined,

    /// Something the tool needs could not be located
    #[error("{what} not found")]
    NotFound { what: String },
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;
