//! [`VersionControl`] implementation driving the `git` command line

use std::path::{Path, PathBuf};

use wsync_tools::ToolOutput;
use wsync_tools::process;

use crate::provider::{CredentialHelper, FULL_FETCH_REFSPEC, RemoteStatus, VersionControl};
use crate::{Error, Result, helpers, version};

/// Remote every operation targets
const REMOTE: &str = "origin";

/// Repository settings applied before every sync
const DEFAULT_CONFIG: &[(&str, &str)] = &[
    ("pull.rebase", "true"),
    ("rebase.autoStash", "true"),
    ("fetch.prune", "true"),
    ("lfs.setlockablereadonly", "false"),
];

/// Output fragments that mean a rebase stopped on conflicting content
const CONFLICT_MARKERS: &[&str] = &["CONFLICT", "could not apply", "Resolve all conflicts"];

/// Git driver for one working tree
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
    executable: PathBuf,
    lfs_executable: PathBuf,
}

impl GitCli {
    /// Driver for the working tree at `root`, using `git` and `git-lfs` from PATH.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            executable: PathBuf::from("git"),
            lfs_executable: PathBuf::from("git-lfs"),
        }
    }

    /// Use explicitly configured executables instead of PATH lookups.
    pub fn with_executables(mut self, git: impl Into<PathBuf>, lfs: impl Into<PathBuf>) -> Self {
        self.executable = git.into();
        self.lfs_executable = lfs.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[&str]) -> Result<ToolOutput> {
        Ok(process::run(&self.executable, args, Some(&self.root))?)
    }

    /// Run and require success.
    fn run_checked(&self, args: &[&str]) -> Result<ToolOutput> {
        let out = self.run(args)?;
        if out.success() {
            Ok(out)
        } else {
            Err(Error::CommandFailed {
                command: args.join(" "),
                code: out.code,
                output: out.output.trim().to_string(),
            })
        }
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let out = self.run(&["config", "--get-all", key])?;
        if !out.success() {
            return Ok(None);
        }
        Ok(out
            .output
            .lines()
            .map(str::trim)
            .rfind(|l| !l.is_empty())
            .map(str::to_string))
    }
}

impl VersionControl for GitCli {
    fn client_version(&self) -> Result<Option<String>> {
        match self.run(&["--version"]) {
            Ok(out) => Ok(version::parse_client_version(&out.output)),
            Err(Error::Tool(wsync_tools::ToolError::Spawn { .. })) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn lfs_version(&self) -> Result<Option<String>> {
        let out = process::run(&self.lfs_executable, &["version"], Some(&self.root));
        match out {
            Ok(out) => Ok(version::parse_lfs_version(&out.output)),
            Err(wsync_tools::ToolError::Spawn { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn credential_helper(&self) -> Result<CredentialHelper> {
        let Some(helper) = self.config_value("credential.helper")? else {
            return Ok(CredentialHelper::Missing);
        };
        if !version::is_manager_helper(&helper) {
            return Ok(CredentialHelper::Foreign(helper));
        }
        let out = self.run(&["credential-manager", "--version"])?;
        Ok(version::parse_manager_version(&out.output)
            .filter(|_| out.success())
            .map(CredentialHelper::Manager)
            .unwrap_or(CredentialHelper::Foreign(helper)))
    }

    fn unset_credential_helpers(&self) -> Result<()> {
        // exit code 5 means there was nothing to unset
        for args in [
            &["config", "--unset-all", "credential.helper"][..],
            &["config", "--global", "--unset-all", "credential.helper"][..],
        ] {
            let out = self.run(args)?;
            if !out.success() && out.code != 5 {
                tracing::warn!(code = out.code, output = %out.output.trim(), "Failed to unset credential helper");
            }
        }
        Ok(())
    }

    fn uses_default_executables(&self) -> bool {
        self.executable == Path::new("git") && self.lfs_executable == Path::new("git-lfs")
    }

    fn executable(&self) -> &Path {
        &self.executable
    }

    fn remote_status(&self) -> Result<RemoteStatus> {
        let repo = helpers::open(&self.root)?;
        let Some(url) = helpers::remote_url(&repo, REMOTE)? else {
            return Ok(RemoteStatus::NotConfigured);
        };
        let out = self.run(&["ls-remote", "--heads", REMOTE])?;
        if out.success() {
            Ok(RemoteStatus::Reachable(url))
        } else {
            tracing::debug!(output = %out.output.trim(), "Remote probe failed");
            Ok(RemoteStatus::Unreachable(url))
        }
    }

    fn configure_defaults(&self) -> Result<()> {
        for (key, value) in DEFAULT_CONFIG {
            self.run_checked(&["config", key, value])?;
        }
        if cfg!(windows) {
            self.run_checked(&["config", "core.autocrlf", "true"])?;
        }
        Ok(())
    }

    fn status_text(&self) -> Result<String> {
        Ok(self.run_checked(&["status", "-uno"])?.output)
    }

    fn fetch_refspecs(&self) -> Result<Vec<String>> {
        let repo = helpers::open(&self.root)?;
        helpers::fetch_refspecs(&repo, REMOTE)
    }

    fn widen_fetch_refspec(&self) -> Result<()> {
        self.run_checked(&["config", "--replace-all", "remote.origin.fetch", FULL_FETCH_REFSPEC])?;
        Ok(())
    }

    fn rebase_continue(&self) -> Result<String> {
        // Accept the recorded message instead of opening an editor
        Ok(self
            .run(&["-c", "core.editor=true", "rebase", "--continue"])?
            .output)
    }

    fn abort_all(&self) -> Result<()> {
        for op in ["rebase", "merge", "cherry-pick", "revert", "am"] {
            let out = self.run(&[op, "--abort"])?;
            if out.success() {
                tracing::info!("Aborted in-progress {op}");
            }
        }
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        let repo = helpers::open(&self.root)?;
        helpers::get_current_branch(&repo)?.ok_or(Error::DetachedHead)
    }

    fn fetch(&self, branches: &[String]) -> Result<()> {
        if branches.is_empty() {
            return Ok(());
        }
        let mut args = vec!["fetch", REMOTE];
        args.extend(branches.iter().map(String::as_str));
        if self.run(&args)?.success() {
            return Ok(());
        }

        // A single missing branch fails the batch; retry one at a time
        let mut last_failure = None;
        let mut fetched = 0;
        for branch in branches {
            let out = self.run(&["fetch", REMOTE, branch.as_str()])?;
            if out.success() {
                fetched += 1;
            } else {
                tracing::debug!(%branch, output = %out.output.trim(), "Branch not fetched");
                last_failure = Some(out);
            }
        }
        match last_failure {
            Some(out) if fetched == 0 => Err(Error::CommandFailed {
                command: format!("fetch {REMOTE} {}", branches.join(" ")),
                code: out.code,
                output: out.output.trim().to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn pull_resolving_conflicts(&self) -> Result<()> {
        let branch = self.current_branch()?;
        let out = self.run(&["pull", "--rebase", "--autostash", REMOTE, branch.as_str()])?;
        if out.success() {
            tracing::debug!(output = %out.output.trim(), "Pull finished");
            return Ok(());
        }
        if out.contains_any(CONFLICT_MARKERS) {
            tracing::error!(output = %out.output.trim(), "Pull stopped on conflicts, aborting");
            self.abort_all()?;
            return Err(Error::PullConflict { branch });
        }
        Err(Error::CommandFailed {
            command: format!("pull --rebase --autostash {REMOTE} {branch}"),
            code: out.code,
            output: out.output.trim().to_string(),
        })
    }

    fn maintain(&self) -> Result<()> {
        for args in [&["maintenance", "run", "--auto"][..], &["lfs", "prune"][..]] {
            let out = self.run(args)?;
            if !out.success() {
                tracing::warn!(command = %args.join(" "), output = %out.output.trim(), "Maintenance step failed");
            }
        }
        Ok(())
    }

    fn checkout_file(&self, path: &Path, revision: &str) -> Result<()> {
        let path = path.to_string_lossy();
        self.run_checked(&["checkout", revision, "--", &*path])?;
        Ok(())
    }

    fn reset_to_remote(&self, branch: &str) -> Result<()> {
        self.run_checked(&["fetch", REMOTE, branch])?;
        let target = format!("{REMOTE}/{branch}");
        self.run_checked(&["reset", "--hard", target.as_str()])?;
        self.run_checked(&["clean", "-fd"])?;
        Ok(())
    }
}
