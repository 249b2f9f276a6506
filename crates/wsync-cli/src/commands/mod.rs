//! Verb implementations

mod clean;
mod publish;
mod sync;
mod version;

use wsync_core::{RuntimeContext, Workspace};

use crate::cli::{Cli, Verb};
use crate::error::Result;

pub fn execute(verb: Verb, cli: &Cli, workspace: &Workspace<'_>, runtime: &RuntimeContext) -> Result<()> {
    match verb {
        Verb::Sync(mode) => sync::run_sync(workspace, mode, cli),
        Verb::PrintVersion(query) => version::run_print(workspace, query, cli.repository.as_deref()),
        Verb::AutoVersion(bump) => version::run_bump(workspace, bump),
        Verb::Clean(target) => clean::run_clean(workspace, target, runtime.is_ci),
        Verb::Publish(branch) => publish::run_publish(workspace, branch, cli.dispatch.as_deref()),
    }
}
