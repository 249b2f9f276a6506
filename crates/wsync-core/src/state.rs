//! Repository state detection and recovery
//!
//! Classification is a pure function of a [`RepositorySnapshot`], the textual
//! status the VCS reports plus the configured fetch refspecs. The status
//! markers are the VCS's human-readable hints and change across client
//! versions, which is one reason the client version is pinned.

use wsync_git::{FULL_FETCH_REFSPEC, VersionControl};
use wsync_tools::EditorProcess;

use wsync_tools::process::contains_any;
use crate::{Error, Result};

/// Substring that signals an in-progress rebase in status output
const REBASE_MARKER: &str = "rebase";

/// Hints the VCS prints once every conflict of a rebase is resolved
const RESOLVED_MARKERS: &[&str] = &[
    "nothing to commit",
    "git rebase --continue",
    "all conflicts fixed",
];

/// Printed by `rebase --continue` when conflicted files are still unmerged
const UNMERGED_MARKER: &str = "must edit all merge conflicts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    Clean,
    /// A rebase is paused and can be continued automatically
    RebaseInProgressResolved,
    /// A rebase is paused on conflicts a human has to resolve
    RebaseInProgressUnresolved,
    /// Only one branch is fetched from `origin`
    SingleBranchClone,
}

/// What the detector reads from the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub status: String,
    pub fetch_refspecs: Vec<String>,
}

impl RepositorySnapshot {
    /// Read a snapshot through non-mutating queries.
    pub fn capture(vcs: &dyn VersionControl) -> Result<Self> {
        Ok(Self {
            status: vcs.status_text()?,
            fetch_refspecs: vcs.fetch_refspecs()?,
        })
    }

    /// Whether `origin` fetches every branch.
    pub fn fetches_all_branches(&self) -> bool {
        self.fetch_refspecs.iter().any(|r| r == FULL_FETCH_REFSPEC)
    }

    /// Classify the snapshot. An in-progress rebase takes precedence.
    pub fn classify(&self) -> RepositoryState {
        if self.status.contains(REBASE_MARKER) {
            if contains_any(&self.status, RESOLVED_MARKERS) {
                RepositoryState::RebaseInProgressResolved
            } else {
                RepositoryState::RebaseInProgressUnresolved
            }
        } else if !self.fetches_all_branches() {
            RepositoryState::SingleBranchClone
        } else {
            RepositoryState::Clean
        }
    }
}

/// What recovery did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    NotNeeded,
    RebaseContinued,
    /// `rebase --continue` found unmerged files, so every operation was aborted
    RebaseAborted,
}

/// Recovers from a paused rebase before the sync proceeds
pub struct StateRecovery<'a> {
    vcs: &'a dyn VersionControl,
    editor: &'a dyn EditorProcess,
}

impl<'a> StateRecovery<'a> {
    pub fn new(vcs: &'a dyn VersionControl, editor: &'a dyn EditorProcess) -> Self {
        Self { vcs, editor }
    }

    pub fn recover(&self, state: RepositoryState) -> Result<Recovery> {
        match state {
            RepositoryState::Clean | RepositoryState::SingleBranchClone => Ok(Recovery::NotNeeded),
            RepositoryState::RebaseInProgressUnresolved => Err(Error::RebaseUnresolved),
            RepositoryState::RebaseInProgressResolved => {
                tracing::info!("Rebase in progress with resolved conflicts; closing the editor and continuing");
                self.editor.close_all()?;
                let output = self.vcs.rebase_continue()?;
                if output.contains(UNMERGED_MARKER) {
                    tracing::warn!("Rebase could not continue, aborting it instead");
                    self.vcs.abort_all()?;
                    Ok(Recovery::RebaseAborted)
                } else {
                    tracing::info!("Rebase continued");
                    Ok(Recovery::RebaseContinued)
                }
            }
        }
    }
}
