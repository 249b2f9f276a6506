//! Error types for wsync-cli and the top-level error boundary
//!
//! Every failure of a run reaches [`Boundary::report`] exactly once. It prints
//! the message, leaves the persisted error marker behind unless the error is
//! hush, opens the support page for fatal errors and, when a person is
//! watching, waits for them to acknowledge.

use std::io::IsTerminal;
use std::path::PathBuf;

use colored::Colorize;
use wsync_fs::ErrorMarker;
use wsync_tools::{Launcher, SystemLauncher};

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from wsync-core
    #[error(transparent)]
    Core(#[from] wsync_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// Invalid invocation; never leaves a marker
    #[error("{message}")]
    Usage { message: String },
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn is_hush(&self) -> bool {
        match self {
            Self::Usage { .. } => true,
            Self::Core(e) => e.is_hush(),
            Self::Io(_) | Self::Dialoguer(_) => false,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_fatal())
    }
}

/// What the boundary knows about the run when it fails
#[derive(Debug, Default)]
pub struct Boundary {
    /// Workspace root, once resolved
    pub root: Option<PathBuf>,
    pub support_url: Option<String>,
    pub is_ci: bool,
}

impl Boundary {
    pub fn new(is_ci: bool) -> Self {
        Self {
            is_ci,
            ..Self::default()
        }
    }

    /// Report `error` and return the process exit code.
    pub fn report(&self, error: &CliError) -> i32 {
        eprintln!("{}: {}", "error".red().bold(), error.to_string().red());
        tracing::debug!(?error, "Run failed");

        if !error.is_hush()
            && let Some(root) = &self.root
        {
            let marker = ErrorMarker::at(root);
            if !marker.is_present()
                && let Err(e) = marker.set(&error.to_string())
            {
                eprintln!("{}: could not write error marker: {e}", "warning".yellow());
            }
        }

        if error.is_fatal()
            && let Some(url) = &self.support_url
        {
            eprintln!("Please follow the instructions at {url}");
            if let Err(e) = SystemLauncher.open_url(url) {
                tracing::debug!(error = %e, "Could not open support page");
            }
        }

        if !self.is_ci && std::io::stdin().is_terminal() {
            let _ = dialoguer::Input::<String>::new()
                .with_prompt("Press enter to continue")
                .allow_empty(true)
                .interact_text();
        }
        1
    }
}
