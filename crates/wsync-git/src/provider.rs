//! The version control capability consumed by the sync engine

use std::path::Path;

use crate::Result;

/// Refspec of a full (not single-branch) clone of `origin`
pub const FULL_FETCH_REFSPEC: &str = "+refs/heads/*:refs/remotes/origin/*";

/// Reachability of the `origin` remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    /// Remote configured and answering
    Reachable(String),
    /// Remote configured but not answering
    Unreachable(String),
    /// No `origin` remote at all
    NotConfigured,
}

/// Which credential helper git will call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialHelper {
    /// The supported credential manager, with its reported version
    Manager(String),
    /// Some other helper, identified by its configured command
    Foreign(String),
    /// No helper configured
    Missing,
}

/// Operations the sync engine performs on the repository.
///
/// Mutating operations block until the underlying tool returns. Methods that
/// report text (`status_text`, `rebase_continue`) return it verbatim so that
/// classification stays with the caller.
pub trait VersionControl {
    /// Installed client version, `None` if the client is not installed.
    fn client_version(&self) -> Result<Option<String>>;

    /// Installed large-file extension version.
    fn lfs_version(&self) -> Result<Option<String>>;

    fn credential_helper(&self) -> Result<CredentialHelper>;

    /// Remove `credential.helper` at local and global scope.
    fn unset_credential_helpers(&self) -> Result<()>;

    /// Whether the client and large-file extension resolve through PATH
    /// rather than explicitly configured locations.
    fn uses_default_executables(&self) -> bool;

    /// The client executable as configured.
    fn executable(&self) -> &Path;

    fn remote_status(&self) -> Result<RemoteStatus>;

    /// Apply the repository configuration the workflow relies on.
    fn configure_defaults(&self) -> Result<()>;

    /// Output of a non-mutating status query (tracked files only).
    fn status_text(&self) -> Result<String>;

    /// Configured fetch refspecs of `origin`.
    fn fetch_refspecs(&self) -> Result<Vec<String>>;

    /// Replace `origin`'s fetch refspecs with [`FULL_FETCH_REFSPEC`].
    fn widen_fetch_refspec(&self) -> Result<()>;

    /// Continue an in-progress rebase, returning the tool's output.
    fn rebase_continue(&self) -> Result<String>;

    /// Abort every in-progress rebase, merge, cherry-pick or revert.
    fn abort_all(&self) -> Result<()>;

    fn current_branch(&self) -> Result<String>;

    /// Fetch the named branches from `origin`. Branches missing on the
    /// remote are skipped.
    fn fetch(&self, branches: &[String]) -> Result<()>;

    /// Rebase local work onto `origin`'s copy of the current branch, aborting
    /// cleanly on conflicts.
    fn pull_resolving_conflicts(&self) -> Result<()>;

    /// Lightweight housekeeping that never touches the checked-out commit.
    fn maintain(&self) -> Result<()>;

    /// Restore `path` in the working tree to its content at `revision`.
    fn checkout_file(&self, path: &Path, revision: &str) -> Result<()>;

    /// Discard all local changes and match `origin/<branch>`.
    fn reset_to_remote(&self, branch: &str) -> Result<()>;
}
