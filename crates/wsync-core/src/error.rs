//! Error types for wsync-core
//!
//! Every blocking failure of a run is an [`Error`]. Its [`ErrorKind`] decides
//! how the top-level boundary reacts: whether the persisted error marker is
//! written and whether the failure is treated as a crash.

use std::path::PathBuf;

/// Result type for wsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes, from the operator's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing configuration
    Configuration,
    /// Invalid command-line usage; never leaves a marker
    Usage,
    /// Installed tools do not match the required versions
    ToolVersion,
    /// The repository is in a state that needs a human
    RepositoryState,
    /// An external step failed; rerunning from the top is safe
    Operational,
    /// The user has to do something before the run can succeed
    UserAction,
    /// Unexpected failure of an external tool
    Crash,
}

/// Errors that can occur in wsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Project configuration missing or unparseable
    #[error("{path} config file is not valid or not found. Please check the integrity of the file: {source}")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: wsync_fs::Error,
    },

    /// A setting the requested operation needs is absent
    #[error("{key} was not configured")]
    SettingMissing { key: String },

    #[error("{message}")]
    Usage { message: String },

    #[error("Repository is currently in an error state. Please fix the issues in your workspace before running again. If you have already fixed the problem, remove {} and run again.", path.display())]
    MarkerPresent { path: PathBuf },

    #[error("Remote connection was not successful. Please verify that you have a valid git remote URL and internet connection. Current git remote URL: {url}")]
    RemoteUnreachable { url: String },

    #[error("No git remote named 'origin' is configured for this workspace")]
    RemoteNotConfigured,

    #[error("Required tools are not at their supported versions: {}", tools.join(", "))]
    ToolVersions { tools: Vec<String> },

    #[error("Git LFS is bundled with Git, overriding your installed version. Please remove: {}", paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    ShadowBinary { paths: Vec<PathBuf> },

    #[error("You are in the middle of a rebase. Changes on one of your commits will be overridden by incoming changes. Please request help to resolve conflicts, and do not run the sync again until the issue is resolved.")]
    RebaseUnresolved,

    #[error("Something went wrong while fetching project version")]
    ProjectVersionUnavailable,

    #[error("Project version '{version}' is not a semantic version")]
    InvalidProjectVersion { version: String },

    #[error("Binaries pull failed, please view log for instructions.")]
    BinariesUserAction,

    #[error("An error occurred while pulling binaries (result {code}). Please request help to resolve it, and do not run the sync again until the issue is resolved.")]
    BinariesCrashed { code: i32 },

    #[error("Failed to pull binaries for {version}")]
    BinariesPullFailed { version: String },

    #[error("Something went wrong while updating {}", path.display())]
    ProjectFileSync { path: PathBuf },

    #[error("Could not find the engine version declared by {}", path.display())]
    EngineVersionMissing { path: PathBuf },

    #[error("Something went wrong while registering engine build {bundle}-{version}")]
    EngineRegistration { bundle: String, version: String },

    #[error("--repository <URL> argument should be provided (or engine.repository configured)")]
    RepositoryUrlMissing,

    #[error("Error while fetching latest engine version from {repository}")]
    LatestEngineVersionMissing { repository: String },

    #[error("Error while updating engine version in {}", path.display())]
    EngineVersionUpdate { path: PathBuf },

    #[error("Something went wrong while cleaning old engine installations ({}). You may want to clean them manually.", failed.join(", "))]
    EngineCleanup { failed: Vec<String> },

    #[error("Something went wrong while wiping the workspace")]
    WorkspaceWipe,

    #[error("{extension} extension is not correctly associated with the engine. Make sure the engine launcher is installed.")]
    FileAssociation { extension: String },

    #[error("Playtester builds are not allowed at the moment.")]
    PlaytesterRejected,

    #[error("Unknown Dispatch branch type specified: {value}")]
    UnknownBranchType { value: String },

    #[error("Executable not found in {} while attempting to apply DRM wrapper.", dir.display())]
    ExecutableNotFound { dir: PathBuf },

    #[error("Something went wrong while pushing a new playable build (exit code {code})")]
    PublishFailed { code: i32 },

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] wsync_fs::Error),

    #[error(transparent)]
    Git(#[from] wsync_git::Error),

    #[error(transparent)]
    Tool(#[from] wsync_tools::ToolError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn setting_missing(key: impl Into<String>) -> Self {
        Self::SettingMissing { key: key.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigInvalid { .. }
            | Self::SettingMissing { .. }
            | Self::RepositoryUrlMissing
            | Self::RemoteNotConfigured
            | Self::PlaytesterRejected => ErrorKind::Configuration,
            Self::Usage { .. } | Self::UnknownBranchType { .. } => ErrorKind::Usage,
            Self::ToolVersions { .. } | Self::ShadowBinary { .. } => ErrorKind::ToolVersion,
            Self::MarkerPresent { .. } | Self::RebaseUnresolved => ErrorKind::RepositoryState,
            Self::Git(wsync_git::Error::PullConflict { .. }) => ErrorKind::RepositoryState,
            Self::BinariesUserAction => ErrorKind::UserAction,
            Self::BinariesCrashed { .. } => ErrorKind::Crash,
            _ => ErrorKind::Operational,
        }
    }

    /// Hush errors never write the persisted error marker.
    pub fn is_hush(&self) -> bool {
        matches!(self.kind(), ErrorKind::Usage) || matches!(self, Self::ConfigInvalid { .. })
    }

    /// Fatal errors point the user at the support resource.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Crash | ErrorKind::RepositoryState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_are_hush() {
        assert!(Error::usage("--dispatch argument should be provided").is_hush());
        assert!(!Error::RebaseUnresolved.is_hush());
        assert!(!Error::BinariesUserAction.is_hush());
    }

    #[test]
    fn invalid_config_is_hush_configuration_error() {
        let err = Error::ConfigInvalid {
            path: PathBuf::from("wsync.toml"),
            source: wsync_fs::Error::UnsupportedFormat {
                extension: "xml".into(),
            },
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.is_hush());
        assert!(err.to_string().contains("wsync.toml"));
    }

    #[test]
    fn binaries_results_map_to_distinct_kinds() {
        assert_eq!(Error::BinariesUserAction.kind(), ErrorKind::UserAction);
        assert_eq!(Error::BinariesCrashed { code: 2 }.kind(), ErrorKind::Crash);
        assert!(Error::BinariesCrashed { code: 2 }.is_fatal());
        assert!(!Error::BinariesUserAction.is_fatal());
    }

    #[test]
    fn remote_errors_distinguish_missing_from_unreachable() {
        let unreachable = Error::RemoteUnreachable {
            url: "https://example.com/p.git".into(),
        };
        assert!(unreachable.to_string().contains("https://example.com/p.git"));
        assert!(Error::RemoteNotConfigured.to_string().contains("No git remote"));
    }

    #[test]
    fn pull_conflict_is_repository_state() {
        let err = Error::Git(wsync_git::Error::PullConflict {
            branch: "dev".into(),
        });
        assert_eq!(err.kind(), ErrorKind::RepositoryState);
    }
}
