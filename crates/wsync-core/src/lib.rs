//! Decision engine for wsync
//!
//! `wsync-core` decides what a synchronization run does and drives the
//! collaborator traits of the Layer 0 crates to do it:
//!
//! - **Tool version gate**: exact version checks and shadow-binary removal
//! - **Repository state**: pure classification of status text, rebase recovery
//! - **Branch sync policy**: which branches to fetch and which workflow to run
//! - **Artifact sync**: checksum-driven binaries pulls with guaranteed restore
//! - **Engine lifecycle**: registration and bounded retirement of engine builds
//! - **Build publishing**: executable selection and push through dispatch
//!
//! # Architecture
//!
//! ```text
//!                    wsync-cli
//!                        |
//!                   wsync-core
//!                        |
//!          +-------------+-------------+
//!          |             |             |
//!      wsync-fs      wsync-git     wsync-tools
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wsync_core::{SyncMode, SyncRequest, Workspace};
//!
//! let workspace = Workspace::new(&config, &user, &runtime, toolchain);
//! workspace.sync(&SyncRequest::new(SyncMode::All))?;
//! ```

pub mod artifacts;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod ops;
pub mod policy;
pub mod project;
pub mod publish;
pub mod state;
pub mod sync;
pub mod workspace;

pub use artifacts::{ArtifactOutcome, ArtifactSyncCoordinator};
pub use config::{ProjectConfig, RuntimeContext, UserConfig};
pub use engine::{EngineBuildIdentity, EngineLifecycleManager};
pub use error::{Error, ErrorKind, Result};
pub use gate::{GateReport, ToolRequirement, ToolVersionGate};
pub use ops::{CleanTarget, VersionQuery};
pub use policy::{BranchContext, SyncMode, SyncPlan, Workflow};
pub use project::{ProjectFiles, VersionBump, VersionMarker};
pub use publish::{BranchType, BuildPublishDispatcher, PublishRequest};
pub use state::{Recovery, RepositorySnapshot, RepositoryState, StateRecovery};
pub use sync::SyncRequest;
pub use workspace::{Toolchain, Workspace};
