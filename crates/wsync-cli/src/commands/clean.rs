//! --clean

use std::io::IsTerminal;

use colored::Colorize;
use dialoguer::Confirm;
use wsync_core::{CleanTarget, Workspace};

use crate::error::Result;

pub fn run_clean(workspace: &Workspace<'_>, target: CleanTarget, is_ci: bool) -> Result<()> {
    if target == CleanTarget::Workspace && !is_ci && std::io::stdin().is_terminal() {
        let confirmed = Confirm::new()
            .with_prompt("This discards every local change in the workspace and cannot be undone. Continue?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Workspace wipe cancelled");
            return Ok(());
        }
    }

    workspace.clean(target)?;
    println!("{} Clean completed", "OK".green().bold());
    Ok(())
}
