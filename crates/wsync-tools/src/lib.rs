//! External tool integration for wsync
//!
//! Every collaborator the sync engine drives but does not implement lives
//! behind a trait here, together with a system implementation that shells
//! out to the real tool:
//!
//! - [`EngineDistribution`]: engine build download, registration and retirement
//! - [`BinaryStore`]: version-pinned binary artifact pulls
//! - [`DispatchTool`]: build publishing
//! - [`EditorProcess`]: detecting and closing running editor instances
//! - [`Launcher`]: opening URLs and project files
//! - [`Elevation`]: one-shot privileged file deletion
//!
//! All invocations are synchronous. [`process::run`] blocks until the tool
//! exits and hands back its combined output and exit code.

pub mod binaries;
pub mod discovery;
pub mod dispatch;
pub mod editor;
pub mod elevation;
pub mod engine;
pub mod error;
pub mod launcher;
pub mod process;

pub use binaries::{BinariesTool, BinaryStore};
pub use dispatch::{DispatchCli, DispatchTool};
pub use editor::{EditorProcess, SystemEditor};
pub use elevation::{Elevation, NoElevation, system_elevation};
pub use engine::{EngineDistribution, InstalledBuild, VersionatorTool, install_name};
pub use error::{Result, ToolError};
pub use launcher::{Launcher, SystemLauncher};
pub use process::ToolOutput;
