//! --publish

use std::path::Path;

use colored::Colorize;
use wsync_core::{BranchType, Workspace};
use wsync_tools::DispatchCli;

use crate::error::{CliError, Result};

pub fn run_publish(workspace: &Workspace<'_>, branch: BranchType, dispatch: Option<&Path>) -> Result<()> {
    let Some(dispatch) = dispatch else {
        return Err(CliError::usage("--dispatch argument should be provided"));
    };
    let tool = DispatchCli::new(dispatch);
    workspace.publish(&tool, branch)?;
    println!("{} Published {branch} build", "OK".green().bold());
    Ok(())
}
