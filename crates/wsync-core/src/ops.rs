//! Non-sync verbs: version queries, version bumps, cleanup and publishing

use std::path::PathBuf;

use wsync_tools::DispatchTool;

use crate::engine::EngineLifecycleManager;
use crate::project::VersionBump;
use crate::publish::{BranchType, BuildPublishDispatcher, PublishRequest};
use crate::workspace::Workspace;
use crate::{Error, Result};

/// What `--printversion` reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionQuery {
    CurrentEngine,
    LatestEngine,
    Project,
}

/// What `--clean` removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanTarget {
    /// Old engine installations
    Engine,
    /// Every local change; not revertible
    Workspace,
}

impl Workspace<'_> {
    /// Newest published engine version matching the project's base version.
    pub fn latest_engine_version(&self, repository: Option<&str>) -> Result<String> {
        let repository = repository
            .or(self.config.engine.repository.as_deref())
            .ok_or(Error::RepositoryUrlMissing)?;

        let versions = self.tools.engine.available_versions(repository).map_err(|e| {
            tracing::debug!(error = %e, "Listing engine versions failed");
            Error::LatestEngineVersionMissing {
                repository: repository.to_string(),
            }
        })?;
        let base = self.config.project.engine_base_version.as_deref().unwrap_or("");
        versions
            .into_iter()
            .rev()
            .find(|v| v.starts_with(base))
            .ok_or_else(|| Error::LatestEngineVersionMissing {
                repository: repository.to_string(),
            })
    }

    pub fn query_version(&self, query: VersionQuery, repository: Option<&str>) -> Result<String> {
        match query {
            VersionQuery::CurrentEngine => self.engine_version(),
            VersionQuery::LatestEngine => self.latest_engine_version(repository),
            VersionQuery::Project => Ok(self.files.version_marker(self.user)?.project_version),
        }
    }

    pub fn bump_version(&self, bump: VersionBump) -> Result<String> {
        self.files.bump_project_version(bump)
    }

    pub fn clean(&self, target: CleanTarget) -> Result<()> {
        match target {
            CleanTarget::Engine => {
                let identity = self.engine_identity(self.default_bundle(), self.engine_version()?);
                let removed = EngineLifecycleManager::new(self.tools.engine).retire(&identity, None)?;
                tracing::info!(removed, "Engine cleanup finished");
                Ok(())
            }
            CleanTarget::Workspace => {
                tracing::warn!("Wiping the workspace; local changes will be lost");
                self.tools.editor.close_all()?;
                let branch = self.tools.vcs.current_branch()?;
                self.tools.vcs.reset_to_remote(&branch).map_err(|e| {
                    tracing::error!(error = %e, "Workspace wipe failed");
                    Error::WorkspaceWipe
                })?;
                tracing::info!(%branch, "Workspace now matches origin");
                Ok(())
            }
        }
    }

    /// Publish the staged build through `tool`.
    pub fn publish(&self, tool: &dyn DispatchTool, branch_type: BranchType) -> Result<PathBuf> {
        let request = PublishRequest::new(branch_type, self.root(), &self.config.dispatch);
        BuildPublishDispatcher::new(tool, &self.user.dispatch).publish(&request)
    }
}
