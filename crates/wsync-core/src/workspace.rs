//! A workspace and the collaborators a run drives

use std::path::{Path, PathBuf};

use wsync_git::VersionControl;
use wsync_tools::{BinaryStore, EditorProcess, Elevation, EngineDistribution, Launcher};

use crate::config::{ProjectConfig, RuntimeContext, UserConfig};
use crate::engine::EngineBuildIdentity;
use crate::project::ProjectFiles;
use crate::{Error, Result};

/// External collaborators of one run
#[derive(Clone, Copy)]
pub struct Toolchain<'a> {
    pub vcs: &'a dyn VersionControl,
    pub engine: &'a dyn EngineDistribution,
    pub binaries: &'a dyn BinaryStore,
    pub editor: &'a dyn EditorProcess,
    pub launcher: &'a dyn Launcher,
    pub elevation: &'a dyn Elevation,
}

/// Configuration plus collaborators for the workspace being synchronized
pub struct Workspace<'a> {
    pub(crate) config: &'a ProjectConfig,
    pub(crate) user: &'a UserConfig,
    pub(crate) runtime: &'a RuntimeContext,
    pub(crate) tools: Toolchain<'a>,
    pub(crate) files: ProjectFiles,
    pub(crate) vcs_install_roots: Vec<PathBuf>,
    pub(crate) open_downloads: bool,
}

impl<'a> Workspace<'a> {
    pub fn new(
        config: &'a ProjectConfig,
        user: &'a UserConfig,
        runtime: &'a RuntimeContext,
        tools: Toolchain<'a>,
    ) -> Self {
        Self {
            config,
            user,
            runtime,
            tools,
            files: ProjectFiles::new(&runtime.root, config),
            vcs_install_roots: Vec::new(),
            open_downloads: cfg!(windows),
        }
    }

    /// VCS install trees to scan for shadow large-file binaries.
    pub fn with_vcs_install_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.vcs_install_roots = roots;
        self
    }

    /// Whether unmet tool requirements open their download pages.
    pub fn with_download_pages(mut self, open: bool) -> Self {
        self.open_downloads = open;
        self
    }

    pub fn root(&self) -> &Path {
        &self.runtime.root
    }

    pub fn files(&self) -> &ProjectFiles {
        &self.files
    }

    /// Engine bundle used when none is requested.
    pub fn default_bundle(&self) -> &str {
        if self.runtime.is_ci {
            &self.config.engine.ci_bundle
        } else {
            &self.config.engine.default_bundle
        }
    }

    /// The engine version the project declares.
    pub fn engine_version(&self) -> Result<String> {
        self.files
            .engine_association()?
            .ok_or_else(|| Error::EngineVersionMissing {
                path: self.files.uproject().to_path_buf(),
            })
    }

    pub(crate) fn engine_identity(&self, bundle: &str, engine_version: String) -> EngineBuildIdentity {
        EngineBuildIdentity {
            bundle: bundle.to_string(),
            engine_version,
            needs_debug_symbols: self.user.project.symbols,
        }
    }
}
