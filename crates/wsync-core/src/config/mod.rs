//! Configuration and runtime context
//!
//! Two documents drive a run:
//!
//! 1. **Project config** - `wsync.toml`, checked into the repository. Required
//!    tool versions, the expected branch, engine and binaries tooling, publish
//!    layout.
//! 2. **User config** - `.wsync/user.toml`, per developer and never committed.
//!    Autosync, a pinned project version, debug symbols, publish IDs.
//!
//! [`RuntimeContext`] adds what only the invocation knows: the workspace root,
//! whether we run under CI, and the (possibly overridden) expected branch.
//!
//! # Example
//!
//! ```ignore
//! use wsync_core::config::{ProjectConfig, RuntimeContext, UserConfig};
//!
//! let project = ProjectConfig::load(&root.join("wsync.toml"))?;
//! let user = UserConfig::load(&root)?;
//! let runtime = RuntimeContext::from_env(root, &project, None);
//! ```

mod project;
mod runtime;
mod user;

pub use project::{
    BinariesSection, DispatchSection, EngineSection, GitSection, LogSection, ProjectConfig,
    ProjectSection,
};
pub use runtime::{RuntimeContext, is_ci_value};
pub use user::{UserConfig, UserDispatch, UserProject};
