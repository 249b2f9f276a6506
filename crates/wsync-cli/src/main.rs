//! wsync CLI
//!
//! One verb per invocation: `--sync`, `--printversion`, `--autoversion`,
//! `--clean` or `--publish`.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::{Path, PathBuf};

use clap::Parser;
use wsync_core::config::is_ci_value;
use wsync_core::gate;
use wsync_core::{ProjectConfig, RuntimeContext, Toolchain, UserConfig, Workspace};
use wsync_fs::ErrorMarker;
use wsync_git::{GitCli, VersionControl};
use wsync_tools::{
    BinariesTool, SystemEditor, SystemLauncher, VersionatorTool, discovery, system_elevation,
};

use cli::Cli;
use error::{Boundary, CliError, Result};

/// Directory launcher scripts start us from
const SCRIPTS_DIR: &str = "Scripts";

fn main() {
    let cli = Cli::parse();
    let mut boundary = Boundary::new(is_ci_value(std::env::var("CI").ok().as_deref()));

    if let Err(e) = run(&cli, &mut boundary) {
        std::process::exit(boundary.report(&e));
    }
}

fn run(cli: &Cli, boundary: &mut Boundary) -> Result<()> {
    let Some(verb) = cli.verb() else {
        return Err(CliError::usage(
            "At least one valid argument should be passed! Did you mean to launch UpdateProject?",
        ));
    };

    let root = enter_workspace(cli.debugpath.as_deref())?;
    boundary.root = Some(root.clone());

    let marker = ErrorMarker::at(&root);
    if marker.is_present() {
        return Err(wsync_core::Error::MarkerPresent {
            path: marker.path().to_path_buf(),
        }
        .into());
    }

    let config = ProjectConfig::load(&root.join(&cli.config))?;
    logging::init(
        cli.verbose,
        config.log.file.as_ref().map(|f| root.join(f)).as_deref(),
    );
    boundary.support_url = config.project.support_url.clone();

    let user = UserConfig::load(&root)?;
    let runtime = RuntimeContext::from_env(&root, &config, cli.debugbranch.as_deref());
    boundary.is_ci = runtime.is_ci;

    let vcs = GitCli::new(&root);
    let engine_config = if runtime.is_ci {
        &config.engine.ci_config
    } else {
        &config.engine.user_config
    };
    let engine = VersionatorTool::new(
        &config.engine.tool,
        &root,
        engine_config,
        config.engine.install_dir.clone(),
    );
    let binaries = BinariesTool::new(&config.binaries.tool, &root);
    let editor = SystemEditor::new(config.project.editor_processes.clone());
    let launcher = SystemLauncher;
    let elevation = system_elevation();

    let toolchain = Toolchain {
        vcs: &vcs,
        engine: &engine,
        binaries: &binaries,
        editor: &editor,
        launcher: &launcher,
        elevation: &*elevation,
    };
    let workspace = Workspace::new(&config, &user, &runtime, toolchain)
        .with_vcs_install_roots(vcs_install_roots(&vcs));

    commands::execute(verb, cli, &workspace, &runtime)
}

/// Resolve and enter the workspace root.
fn enter_workspace(debug_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = debug_path {
        std::env::set_current_dir(path)?;
    } else {
        let cwd = std::env::current_dir()?;
        if cwd.file_name().is_some_and(|name| name == SCRIPTS_DIR)
            && let Some(parent) = cwd.parent()
        {
            std::env::set_current_dir(parent)?;
        }
    }
    Ok(std::env::current_dir()?)
}

/// VCS install trees that may carry shadow large-file binaries.
fn vcs_install_roots(vcs: &GitCli) -> Vec<PathBuf> {
    if cfg!(windows) && vcs.uses_default_executables() {
        gate::vcs_install_roots(&discovery::find_all("git"))
    } else {
        Vec::new()
    }
}
