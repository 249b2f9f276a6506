//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use wsync_core::{BranchType, CleanTarget, SyncMode, VersionBump, VersionQuery};

/// wsync - keep an engine project workspace in sync
#[derive(Parser, Debug)]
#[command(name = "wsync")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("verb")
        .args(["sync", "printversion", "autoversion", "clean", "publish"])
        .multiple(false)
))]
pub struct Cli {
    /// Main command to run
    #[arg(long, value_enum)]
    pub sync: Option<SyncArg>,

    /// Print the requested version information
    #[arg(long, value_enum)]
    pub printversion: Option<PrintArg>,

    /// Bump the project version
    #[arg(long, value_enum)]
    pub autoversion: Option<BumpArg>,

    /// Clean old engine installations or wipe the workspace
    #[arg(long, value_enum)]
    pub clean: Option<CleanArg>,

    /// Push a staged build (requires --dispatch)
    #[arg(long, value_enum)]
    pub publish: Option<PublishArg>,

    /// Engine repository URL for engine version lookups
    #[arg(long)]
    pub repository: Option<String>,

    /// Engine bundle to register with --sync engine
    #[arg(long)]
    pub bundle: Option<String>,

    /// Project config file, relative to the workspace root
    #[arg(long, default_value = "wsync.toml")]
    pub config: PathBuf,

    /// Path of the dispatch executable
    #[arg(long, env = "WSYNC_DISPATCH")]
    pub dispatch: Option<PathBuf>,

    /// Run as if started in this directory
    #[arg(long)]
    pub debugpath: Option<PathBuf>,

    /// Treat this branch as the expected branch
    #[arg(long)]
    pub debugbranch: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncArg {
    All,
    Force,
    Partial,
    Binaries,
    #[value(name = "engineversion")]
    EngineVersion,
    Engine,
    Ddc,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintArg {
    CurrentEngine,
    LatestEngine,
    Project,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpArg {
    Hotfix,
    Stable,
    Public,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanArg {
    Engine,
    Workspace,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishArg {
    Internal,
    Playtester,
}

/// The single top-level action of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Sync(SyncMode),
    PrintVersion(VersionQuery),
    AutoVersion(VersionBump),
    Clean(CleanTarget),
    Publish(BranchType),
}

impl Cli {
    /// The requested verb; clap guarantees at most one.
    pub fn verb(&self) -> Option<Verb> {
        if let Some(mode) = self.sync {
            return Some(Verb::Sync(mode.into()));
        }
        if let Some(query) = self.printversion {
            return Some(Verb::PrintVersion(query.into()));
        }
        if let Some(bump) = self.autoversion {
            return Some(Verb::AutoVersion(bump.into()));
        }
        if let Some(target) = self.clean {
            return Some(Verb::Clean(target.into()));
        }
        self.publish.map(|branch| Verb::Publish(branch.into()))
    }
}

impl From<SyncArg> for SyncMode {
    fn from(arg: SyncArg) -> Self {
        match arg {
            SyncArg::All => Self::All,
            SyncArg::Force => Self::Force,
            SyncArg::Partial => Self::Partial,
            SyncArg::Binaries => Self::Binaries,
            SyncArg::EngineVersion => Self::EngineVersion,
            SyncArg::Engine => Self::Engine,
            SyncArg::Ddc => Self::Ddc,
        }
    }
}

impl From<PrintArg> for VersionQuery {
    fn from(arg: PrintArg) -> Self {
        match arg {
            PrintArg::CurrentEngine => Self::CurrentEngine,
            PrintArg::LatestEngine => Self::LatestEngine,
            PrintArg::Project => Self::Project,
        }
    }
}

impl From<BumpArg> for VersionBump {
    fn from(arg: BumpArg) -> Self {
        match arg {
            BumpArg::Hotfix => Self::Hotfix,
            BumpArg::Stable => Self::Stable,
            BumpArg::Public => Self::Public,
        }
    }
}

impl From<CleanArg> for CleanTarget {
    fn from(arg: CleanArg) -> Self {
        match arg {
            CleanArg::Engine => Self::Engine,
            CleanArg::Workspace => Self::Workspace,
        }
    }
}

impl From<PublishArg> for BranchType {
    fn from(arg: PublishArg) -> Self {
        match arg {
            PublishArg::Internal => Self::Internal,
            PublishArg::Playtester => Self::Playtester,
        }
    }
}
