//! --printversion and --autoversion

use std::io::Write;

use wsync_core::{VersionBump, VersionQuery, Workspace};

use crate::error::Result;

/// Print without a trailing newline; scripts capture the output verbatim.
pub fn run_print(workspace: &Workspace<'_>, query: VersionQuery, repository: Option<&str>) -> Result<()> {
    let version = workspace.query_version(query, repository)?;
    let mut stdout = std::io::stdout();
    write!(stdout, "{version}")?;
    stdout.flush()?;
    Ok(())
}

pub fn run_bump(workspace: &Workspace<'_>, bump: VersionBump) -> Result<()> {
    let version = workspace.bump_version(bump)?;
    println!("Project version is now {version}");
    Ok(())
}
