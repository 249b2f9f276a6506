//! --sync

use colored::Colorize;
use wsync_core::{SyncMode, SyncRequest, Workspace};

use crate::cli::Cli;
use crate::error::Result;

pub fn run_sync(workspace: &Workspace<'_>, mode: SyncMode, cli: &Cli) -> Result<()> {
    let request = SyncRequest {
        mode,
        repository: cli.repository.clone(),
        bundle: cli.bundle.clone(),
    };
    workspace.sync(&request)?;
    println!("{} Sync ({mode}) completed", "OK".green().bold());
    Ok(())
}
