//! Sync orchestration
//!
//! Executes the decisions of [`crate::policy`] against the workspace's
//! collaborators. Repository modes (`all`, `force`, `partial`) walk:
//!
//! ```text
//! remote check -> tool gate -> git defaults -> state recovery
//!     -> refspec -> fetch -> workflow -> engine housekeeping
//! ```
//!
//! Every step either succeeds or halts the run with an [`Error`]; nothing
//! mutates the repository before the tool gate has passed.

use wsync_git::RemoteStatus;
use wsync_tools::discovery;

use crate::artifacts::ArtifactSyncCoordinator;
use crate::engine::EngineLifecycleManager;
use crate::gate::{self, ToolVersionGate};
use crate::policy::{self, BranchContext, CI_KEPT_ENGINE_BUILDS, SyncMode, SyncPlan, Workflow};
use crate::state::{RepositorySnapshot, StateRecovery};
use crate::workspace::Workspace;
use crate::{Error, Result};

/// One `--sync` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub mode: SyncMode,
    /// Engine repository for `engineversion`
    pub repository: Option<String>,
    /// Engine bundle for `engine`
    pub bundle: Option<String>,
}

impl SyncRequest {
    pub fn new(mode: SyncMode) -> Self {
        Self {
            mode,
            repository: None,
            bundle: None,
        }
    }
}

impl Workspace<'_> {
    pub fn sync(&self, request: &SyncRequest) -> Result<()> {
        tracing::info!(mode = %request.mode, "Starting sync");
        match request.mode {
            SyncMode::All | SyncMode::Force | SyncMode::Partial => self.sync_repository(request.mode),
            SyncMode::EngineVersion => self.sync_engine_version(request.repository.as_deref()),
            SyncMode::Binaries => self.sync_binaries(),
            SyncMode::Engine => self.sync_engine(request.bundle.as_deref()),
            SyncMode::Ddc => self.generate_ddc(),
        }
    }

    fn sync_repository(&self, mode: SyncMode) -> Result<()> {
        let vcs = self.tools.vcs;

        self.check_remote()?;
        self.check_tools()?;
        vcs.configure_defaults()?;

        let snapshot = RepositorySnapshot::capture(vcs)?;
        let state = snapshot.classify();
        tracing::debug!(?state, "Repository state");
        StateRecovery::new(vcs, self.tools.editor).recover(state)?;

        let ctx = BranchContext {
            current_branch: vcs.current_branch()?,
            expected_branch: self.runtime.expected_branch.clone(),
            is_ci: self.runtime.is_ci,
        };
        if policy::should_widen_refspec(&ctx, snapshot.fetches_all_branches()) {
            tracing::info!("Fetching all branches from origin");
            vcs.widen_fetch_refspec()?;
        }

        let plan = policy::plan(mode, &ctx, self.user.project.autosync);
        tracing::debug!(?plan, "Sync plan");
        if !plan.fetch.is_empty() {
            tracing::info!(branches = ?plan.fetch, "Fetching recent changes");
            vcs.fetch(&plan.fetch)?;
        }

        self.run_workflow(&plan, &ctx)?;
        self.update_engine(&plan)
    }

    fn check_remote(&self) -> Result<()> {
        match self.tools.vcs.remote_status()? {
            RemoteStatus::Reachable(url) => {
                if let Some(expected) = &self.config.git.url
                    && expected != &url
                {
                    tracing::warn!(%url, %expected, "Remote URL differs from the configured project URL");
                }
                tracing::info!(%url, "Remote connection is established");
                Ok(())
            }
            RemoteStatus::Unreachable(url) => Err(Error::RemoteUnreachable { url }),
            RemoteStatus::NotConfigured => Err(Error::RemoteNotConfigured),
        }
    }

    fn check_tools(&self) -> Result<()> {
        let shadows = gate::find_shadow_binaries(&self.vcs_install_roots);
        gate::remove_shadow_binaries(&shadows, self.tools.elevation)?;

        ToolVersionGate::new(&self.config.git, self.tools.vcs, self.tools.launcher)
            .open_downloads(self.open_downloads)
            .check()?
            .into_result()
    }

    fn run_workflow(&self, plan: &SyncPlan, ctx: &BranchContext) -> Result<()> {
        let vcs = self.tools.vcs;
        match plan.workflow {
            Workflow::Full => {
                tracing::info!(branch = %ctx.current_branch, "Pulling latest changes");
                vcs.pull_resolving_conflicts()?;
                self.sync_artifacts()
            }
            Workflow::Partial => {
                tracing::info!(branch = %ctx.current_branch, "Partial sync, skipping the pull");
                vcs.maintain()?;
                self.sync_artifacts()
            }
            Workflow::AutosyncPull => {
                tracing::info!(branch = %ctx.current_branch, "Autosync is enabled, pulling latest changes");
                vcs.pull_resolving_conflicts()?;
                Ok(())
            }
            Workflow::Maintenance { autosync_hint } => {
                if autosync_hint {
                    tracing::info!(
                        branch = %ctx.current_branch,
                        "Current branch does not need auto synchronization"
                    );
                }
                vcs.maintain()?;
                Ok(())
            }
        }
    }

    fn sync_artifacts(&self) -> Result<()> {
        let marker = self.files.version_marker(self.user)?;
        tracing::info!(
            version = %marker.project_version,
            custom = marker.is_custom_version,
            "Project version"
        );
        ArtifactSyncCoordinator::new(
            self.tools.vcs,
            self.tools.binaries,
            self.root(),
            &self.config.git.checksum_file,
        )
        .sync(&marker)?;
        Ok(())
    }

    /// Register the declared engine build and hand the project to the editor.
    fn update_engine(&self, plan: &SyncPlan) -> Result<()> {
        tracing::info!("Checking for engine updates");
        let uproject = &self.config.project.uproject;
        if let Err(e) = self.tools.vcs.checkout_file(uproject, "HEAD") {
            tracing::debug!(error = %e, "Project file checkout failed");
            return Err(Error::ProjectFileSync {
                path: uproject.clone(),
            });
        }

        let identity = self.engine_identity(self.default_bundle(), self.engine_version()?);
        let lifecycle = EngineLifecycleManager::new(self.tools.engine);
        lifecycle.register(&identity)?;

        if plan.retire_engine_builds
            && let Err(e) = lifecycle.retire(&identity, None)
        {
            tracing::warn!("{e}");
        }

        self.update_source_control();
        self.open_project()
    }

    fn update_source_control(&self) {
        let configured = self.tools.vcs.executable();
        let executable = if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            discovery::find(&configured.to_string_lossy()).unwrap_or_else(|| configured.to_path_buf())
        };
        match self.files.write_scm_settings(&executable) {
            Ok(path) => tracing::info!(path = %path.display(), "Updated editor source control settings"),
            Err(e) => tracing::warn!(error = %e, "Failed to update editor source control settings"),
        }
    }

    fn open_project(&self) -> Result<()> {
        let launcher = self.tools.launcher;
        if !launcher.file_association_ok(".uproject") {
            return Err(Error::FileAssociation {
                extension: ".uproject".into(),
            });
        }
        if self.tools.editor.is_running() {
            tracing::info!("Editor is already running, skipping project launch");
            return Ok(());
        }
        let path = self.files.uproject();
        match launcher.open_path(path) {
            Ok(()) => tracing::info!(project = %path.display(), "Launching the project"),
            Err(e) => tracing::warn!(error = %e, "Could not launch the project; you may now launch it manually"),
        }
        Ok(())
    }

    fn sync_engine_version(&self, repository: Option<&str>) -> Result<()> {
        let version = self.latest_engine_version(repository)?;
        self.files.set_engine_association(&version).map_err(|e| {
            tracing::debug!(error = %e, "Engine association rewrite failed");
            Error::EngineVersionUpdate {
                path: self.files.uproject().to_path_buf(),
            }
        })?;
        tracing::info!(%version, "Successfully changed engine version");
        Ok(())
    }

    fn sync_binaries(&self) -> Result<()> {
        let marker = self.files.version_marker(self.user)?;
        ArtifactSyncCoordinator::new(
            self.tools.vcs,
            self.tools.binaries,
            self.root(),
            &self.config.git.checksum_file,
        )
        .force_pull(&marker.project_version)
    }

    fn sync_engine(&self, bundle: Option<&str>) -> Result<()> {
        let bundle = bundle.unwrap_or_else(|| self.default_bundle());
        let identity = self.engine_identity(bundle, self.engine_version()?);
        let lifecycle = EngineLifecycleManager::new(self.tools.engine);
        lifecycle.register(&identity)?;

        if self.runtime.is_ci
            && let Err(e) = lifecycle.retire(&identity, Some(CI_KEPT_ENGINE_BUILDS))
        {
            tracing::warn!("{e}");
        }
        Ok(())
    }

    fn generate_ddc(&self) -> Result<()> {
        let version = self.engine_version()?;
        tracing::info!(%version, "Generating derived data cache");
        self.tools.engine.generate_ddc(self.files.uproject(), &version)?;
        tracing::info!("Derived data cache generated");
        Ok(())
    }
}
