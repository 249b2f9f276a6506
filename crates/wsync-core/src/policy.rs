//! Branch sync policy
//!
//! Pure decisions: given the requested mode and where the working tree sits
//! relative to the expected branch, which branches to fetch and which
//! workflow to run. The orchestrator in [`crate::sync`] executes the plan.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Branches always fetched alongside the expected and current branch
const MAINLINE_BRANCHES: &[&str] = &["master", "trunk"];

/// Engine builds of the CI bundle kept after an engine sync under CI
pub const CI_KEPT_ENGINE_BUILDS: usize = 3;

/// What `--sync` was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    All,
    Force,
    Partial,
    EngineVersion,
    Binaries,
    Engine,
    Ddc,
}

impl SyncMode {
    pub const ALL: &[SyncMode] = &[
        Self::All,
        Self::Force,
        Self::Partial,
        Self::Binaries,
        Self::EngineVersion,
        Self::Engine,
        Self::Ddc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Force => "force",
            Self::Partial => "partial",
            Self::EngineVersion => "engineversion",
            Self::Binaries => "binaries",
            Self::Engine => "engine",
            Self::Ddc => "ddc",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::usage(format!("Unknown sync mode: {s}")))
    }
}

/// Where the working tree is, relative to the expected branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub current_branch: String,
    pub expected_branch: String,
    pub is_ci: bool,
}

impl BranchContext {
    pub fn is_on_expected(&self) -> bool {
        self.current_branch == self.expected_branch
    }
}

/// How local work is brought up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    /// Rebase onto the remote, then binaries
    Full,
    /// Housekeeping in place of the rebase, then binaries
    Partial,
    /// Rebase onto the remote only
    AutosyncPull,
    /// Housekeeping without touching the checked-out commit.
    /// `autosync_hint` tells the user pulling is disabled off the expected branch.
    Maintenance { autosync_hint: bool },
}

/// The decisions for one repository sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub fetch: Vec<String>,
    pub workflow: Workflow,
    /// Retire old engine builds after registering the current one
    pub retire_engine_builds: bool,
}

/// Decide the workflow for a repository sync.
///
/// `Force` always takes the full path and `Partial` never rebases.
pub fn select_workflow(mode: SyncMode, ctx: &BranchContext, autosync: bool) -> Workflow {
    match mode {
        SyncMode::Force => Workflow::Full,
        SyncMode::Partial if ctx.is_on_expected() => Workflow::Partial,
        _ if ctx.is_on_expected() => Workflow::Full,
        _ if autosync => Workflow::AutosyncPull,
        _ => Workflow::Maintenance { autosync_hint: true },
    }
}

/// Branches worth fetching when not on the expected branch, without duplicates.
pub fn branches_to_fetch(mode: SyncMode, ctx: &BranchContext) -> Vec<String> {
    if mode == SyncMode::Partial || ctx.is_on_expected() {
        return Vec::new();
    }
    let candidates = std::iter::once(ctx.expected_branch.as_str())
        .chain(MAINLINE_BRANCHES.iter().copied())
        .chain(std::iter::once(ctx.current_branch.as_str()));

    let mut branches: Vec<String> = Vec::new();
    for branch in candidates {
        if !branch.is_empty() && !branches.iter().any(|b| b == branch) {
            branches.push(branch.to_string());
        }
    }
    branches
}

/// Whether to rewrite `origin`'s refspec to fetch every branch.
///
/// CI agents often clone a single branch on purpose.
pub fn should_widen_refspec(ctx: &BranchContext, fetches_all_branches: bool) -> bool {
    !ctx.is_ci && !fetches_all_branches
}

/// Build the plan for a repository sync mode.
pub fn plan(mode: SyncMode, ctx: &BranchContext, autosync: bool) -> SyncPlan {
    SyncPlan {
        fetch: branches_to_fetch(mode, ctx),
        workflow: select_workflow(mode, ctx, autosync),
        retire_engine_builds: ctx.is_on_expected(),
    }
}
