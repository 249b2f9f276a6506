//! In-memory collaborators for driving the decision engine in tests
//!
//! Every fake appends to a shared [`Journal`], so tests can assert both which
//! calls happened and in what order.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use wsync_core::config::{
    BinariesSection, DispatchSection, EngineSection, GitSection, LogSection, ProjectSection,
};
use wsync_core::{ProjectConfig, RuntimeContext, Toolchain, UserConfig, Workspace};
use wsync_git::{CredentialHelper, FULL_FETCH_REFSPEC, RemoteStatus, VersionControl};
use wsync_tools::{
    BinaryStore, DispatchTool, EditorProcess, Elevation, EngineDistribution, InstalledBuild,
    Launcher, ToolError, ToolOutput,
};

pub const GIT_VERSION: &str = "2.39.1.windows.1";
pub const LFS_VERSION: &str = "3.3.0";
pub const GCM_VERSION: &str = "2.0.886";
pub const ENGINE_VERSION: &str = "4.27-PB-100";
pub const PROJECT_VERSION: &str = "1.5.0";
pub const CHECKSUM_FILE: &str = "Binaries/checksum.json";
pub const UPROJECT: &str = "Project.uproject";

/// Ordered record of collaborator calls
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.borrow().iter().any(|e| e == entry)
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.0.borrow().iter().any(|e| e.starts_with(prefix))
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == entry)
    }

    pub fn position_prefix(&self, prefix: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e.starts_with(prefix))
    }

    pub fn last_with_prefix(&self, prefix: &str) -> Option<String> {
        self.0.borrow().iter().rev().find(|e| e.starts_with(prefix)).cloned()
    }
}

fn failure(what: &str) -> ToolError {
    ToolError::Failed {
        program: what.to_string(),
        code: 1,
        output: format!("{what} failed"),
    }
}

pub struct FakeVcs {
    pub journal: Journal,
    pub root: PathBuf,
    pub client_version: Option<String>,
    pub lfs_version: Option<String>,
    pub helper: CredentialHelper,
    pub remote: RemoteStatus,
    pub status: String,
    pub refspecs: Vec<String>,
    pub branch: String,
    pub continue_output: String,
    pub pull_fails: bool,
    pub fetch_fails: bool,
    /// Content written to a file when it is checked out at a revision
    pub revisions: HashMap<String, String>,
    pub failing_revisions: Vec<String>,
    pub checked_out: RefCell<HashMap<PathBuf, String>>,
    executable: PathBuf,
}

impl FakeVcs {
    pub fn new(journal: Journal, root: &Path, branch: &str) -> Self {
        Self {
            journal,
            root: root.to_path_buf(),
            client_version: Some(GIT_VERSION.into()),
            lfs_version: Some(LFS_VERSION.into()),
            helper: CredentialHelper::Manager(GCM_VERSION.into()),
            remote: RemoteStatus::Reachable("https://example.com/project.git".into()),
            status: "On branch main\nnothing to commit (use -u to show untracked files)".into(),
            refspecs: vec![FULL_FETCH_REFSPEC.to_string()],
            branch: branch.to_string(),
            continue_output: "Successfully rebased and updated refs/heads/dev.".into(),
            pull_fails: false,
            fetch_fails: false,
            revisions: HashMap::from([("HEAD".to_string(), "{\"head\": true}".to_string())]),
            failing_revisions: Vec::new(),
            checked_out: RefCell::new(HashMap::new()),
            executable: PathBuf::from("/usr/bin/git"),
        }
    }

    /// Revision the file was last checked out at.
    pub fn revision_of(&self, path: &str) -> Option<String> {
        self.checked_out.borrow().get(Path::new(path)).cloned()
    }
}

impl VersionControl for FakeVcs {
    fn client_version(&self) -> wsync_git::Result<Option<String>> {
        self.journal.push("vcs.client_version");
        Ok(self.client_version.clone())
    }

    fn lfs_version(&self) -> wsync_git::Result<Option<String>> {
        self.journal.push("vcs.lfs_version");
        Ok(self.lfs_version.clone())
    }

    fn credential_helper(&self) -> wsync_git::Result<CredentialHelper> {
        self.journal.push("vcs.credential_helper");
        Ok(self.helper.clone())
    }

    fn unset_credential_helpers(&self) -> wsync_git::Result<()> {
        self.journal.push("vcs.unset_credential_helpers");
        Ok(())
    }

    fn uses_default_executables(&self) -> bool {
        true
    }

    fn executable(&self) -> &Path {
        &self.executable
    }

    fn remote_status(&self) -> wsync_git::Result<RemoteStatus> {
        self.journal.push("vcs.remote_status");
        Ok(self.remote.clone())
    }

    fn configure_defaults(&self) -> wsync_git::Result<()> {
        self.journal.push("vcs.configure_defaults");
        Ok(())
    }

    fn status_text(&self) -> wsync_git::Result<String> {
        self.journal.push("vcs.status");
        Ok(self.status.clone())
    }

    fn fetch_refspecs(&self) -> wsync_git::Result<Vec<String>> {
        Ok(self.refspecs.clone())
    }

    fn widen_fetch_refspec(&self) -> wsync_git::Result<()> {
        self.journal.push("vcs.widen_fetch_refspec");
        Ok(())
    }

    fn rebase_continue(&self) -> wsync_git::Result<String> {
        self.journal.push("vcs.rebase_continue");
        Ok(self.continue_output.clone())
    }

    fn abort_all(&self) -> wsync_git::Result<()> {
        self.journal.push("vcs.abort_all");
        Ok(())
    }

    fn current_branch(&self) -> wsync_git::Result<String> {
        Ok(self.branch.clone())
    }

    fn fetch(&self, branches: &[String]) -> wsync_git::Result<()> {
        self.journal.push(format!("vcs.fetch {}", branches.join(",")));
        if self.fetch_fails {
            return Err(wsync_git::Error::CommandFailed {
                command: format!("fetch origin {}", branches.join(" ")),
                code: 128,
                output: "fatal: could not read from remote repository".into(),
            });
        }
        Ok(())
    }

    fn pull_resolving_conflicts(&self) -> wsync_git::Result<()> {
        self.journal.push("vcs.pull");
        if self.pull_fails {
            return Err(wsync_git::Error::PullConflict {
                branch: self.branch.clone(),
            });
        }
        Ok(())
    }

    fn maintain(&self) -> wsync_git::Result<()> {
        self.journal.push("vcs.maintain");
        Ok(())
    }

    fn checkout_file(&self, path: &Path, revision: &str) -> wsync_git::Result<()> {
        self.journal
            .push(format!("vcs.checkout {}@{}", path.display(), revision));
        if self.failing_revisions.iter().any(|r| r == revision) {
            return Err(wsync_git::Error::CommandFailed {
                command: format!("checkout {revision}"),
                code: 1,
                output: format!("error: pathspec '{revision}' did not match"),
            });
        }
        if let Some(content) = self.revisions.get(revision)
            && path == Path::new(CHECKSUM_FILE)
        {
            let target = self.root.join(path);
            std::fs::create_dir_all(target.parent().unwrap()).unwrap();
            std::fs::write(target, content).unwrap();
        }
        self.checked_out
            .borrow_mut()
            .insert(path.to_path_buf(), revision.to_string());
        Ok(())
    }

    fn reset_to_remote(&self, branch: &str) -> wsync_git::Result<()> {
        self.journal.push(format!("vcs.reset_to_remote {branch}"));
        Ok(())
    }
}

pub struct FakeEngine {
    pub journal: Journal,
    pub register_fails: bool,
    pub remove_fails: bool,
    pub versions: Vec<String>,
    pub installed: RefCell<Vec<InstalledBuild>>,
}

impl FakeEngine {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            register_fails: false,
            remove_fails: false,
            versions: Vec::new(),
            installed: RefCell::new(Vec::new()),
        }
    }

    /// Install builds named `names`, oldest first.
    pub fn with_installed(self, names: &[&str]) -> Self {
        let builds = names
            .iter()
            .enumerate()
            .map(|(i, name)| InstalledBuild {
                name: name.to_string(),
                path: PathBuf::from("/engines").join(name),
                modified: SystemTime::UNIX_EPOCH + Duration::from_secs(1_000 + i as u64),
            })
            .collect();
        *self.installed.borrow_mut() = builds;
        self
    }

    pub fn installed_names(&self) -> Vec<String> {
        self.installed.borrow().iter().map(|b| b.name.clone()).collect()
    }
}

impl EngineDistribution for FakeEngine {
    fn register(&self, bundle: &str, symbols: bool) -> wsync_tools::Result<()> {
        self.journal
            .push(format!("engine.register {bundle} symbols={symbols}"));
        if self.register_fails {
            return Err(failure("versionator"));
        }
        Ok(())
    }

    fn available_versions(&self, repository: &str) -> wsync_tools::Result<Vec<String>> {
        self.journal.push(format!("engine.available_versions {repository}"));
        Ok(self.versions.clone())
    }

    fn installed_builds(&self) -> wsync_tools::Result<Vec<InstalledBuild>> {
        Ok(self.installed.borrow().clone())
    }

    fn remove_build(&self, build: &InstalledBuild) -> wsync_tools::Result<()> {
        self.journal.push(format!("engine.remove {}", build.name));
        if self.remove_fails {
            return Err(failure("remove"));
        }
        self.installed.borrow_mut().retain(|b| b.name != build.name);
        Ok(())
    }

    fn generate_ddc(&self, uproject: &Path, engine_version: &str) -> wsync_tools::Result<()> {
        self.journal.push(format!(
            "engine.ddc {} {engine_version}",
            uproject.file_name().unwrap().to_string_lossy()
        ));
        Ok(())
    }
}

pub struct FakeBinaries {
    pub journal: Journal,
    pub code: i32,
}

impl BinaryStore for FakeBinaries {
    fn pull(&self, version: &str, force: bool) -> wsync_tools::Result<i32> {
        self.journal
            .push(format!("binaries.pull {version} force={force}"));
        Ok(self.code)
    }
}

pub struct FakeEditor {
    pub journal: Journal,
    pub running: bool,
}

impl EditorProcess for FakeEditor {
    fn is_running(&self) -> bool {
        self.running
    }

    fn close_all(&self) -> wsync_tools::Result<usize> {
        self.journal.push("editor.close_all");
        Ok(usize::from(self.running))
    }
}

pub struct FakeLauncher {
    pub journal: Journal,
    pub association_ok: bool,
}

impl Launcher for FakeLauncher {
    fn open_url(&self, url: &str) -> wsync_tools::Result<()> {
        self.journal.push(format!("launcher.open_url {url}"));
        Ok(())
    }

    fn open_path(&self, path: &Path) -> wsync_tools::Result<()> {
        self.journal.push(format!(
            "launcher.open_path {}",
            path.file_name().unwrap().to_string_lossy()
        ));
        Ok(())
    }

    fn file_association_ok(&self, _extension: &str) -> bool {
        self.association_ok
    }
}

pub struct FakeElevation {
    pub journal: Journal,
    pub elevated: bool,
    /// Whether the elevated subprocess actually deletes
    pub grants: bool,
}

impl Elevation for FakeElevation {
    fn is_elevated(&self) -> bool {
        self.elevated
    }

    fn delete_elevated(&self, paths: &[PathBuf]) -> wsync_tools::Result<()> {
        self.journal
            .push(format!("elevation.delete {}", paths.len()));
        if !self.grants {
            return Err(ToolError::ElevationDeclined);
        }
        for path in paths {
            std::fs::remove_file(path).unwrap();
        }
        Ok(())
    }
}

pub struct FakeDispatch {
    pub journal: Journal,
    pub push_code: i32,
    pub wrap_code: i32,
    pub wrapped: Cell<bool>,
}

impl FakeDispatch {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            push_code: 0,
            wrap_code: 0,
            wrapped: Cell::new(false),
        }
    }
}

impl DispatchTool for FakeDispatch {
    fn push(&self, branch_id: &str, config: &Path, stage_dir: &Path) -> wsync_tools::Result<ToolOutput> {
        self.journal.push(format!(
            "dispatch.push {branch_id} {} {}",
            config.file_name().unwrap().to_string_lossy(),
            stage_dir.file_name().unwrap().to_string_lossy()
        ));
        Ok(ToolOutput::new(self.push_code, "Build pushed\n"))
    }

    fn drm_wrap(&self, app_id: &str, executable: &Path) -> wsync_tools::Result<ToolOutput> {
        self.journal.push(format!(
            "dispatch.drm_wrap {app_id} {}",
            executable.file_name().unwrap().to_string_lossy()
        ));
        self.wrapped.set(true);
        Ok(ToolOutput::new(self.wrap_code, ""))
    }
}

pub fn project_config() -> ProjectConfig {
    ProjectConfig {
        git: GitSection {
            version: GIT_VERSION.into(),
            lfs_version: LFS_VERSION.into(),
            gcm_version: GCM_VERSION.into(),
            gcm_version_suffix: String::new(),
            gcm_download_suffix: "win-x86".into(),
            expected_branch: "dev".into(),
            url: None,
            checksum_file: PathBuf::from(CHECKSUM_FILE),
        },
        log: LogSection::default(),
        engine: EngineSection {
            tool: PathBuf::from("ue4versionator"),
            user_config: PathBuf::from(".ue4v-user"),
            ci_config: PathBuf::from(".ue4v-ci"),
            default_bundle: "editor".into(),
            ci_bundle: "engine".into(),
            install_dir: None,
            repository: None,
        },
        project: ProjectSection {
            uproject: PathBuf::from(UPROJECT),
            engine_base_version: Some("4.27".into()),
            default_game_ini: PathBuf::from("Config/DefaultGame.ini"),
            editor_processes: vec!["UE4Editor".into()],
            support_url: None,
        },
        binaries: BinariesSection {
            tool: PathBuf::from("pbgh"),
        },
        dispatch: DispatchSection {
            config: PathBuf::from("Dispatch/config.json"),
            stage_dir: PathBuf::from("Saved/StagedBuilds"),
            drm: PathBuf::from("Saved/StagedBuilds/Project/Binaries/Win64"),
            default_executable: "Project.exe".into(),
            apply_drm: false,
        },
    }
}

/// A scratch workspace with project files and a full set of fakes
pub struct Fixture {
    pub temp: TempDir,
    pub journal: Journal,
    pub config: ProjectConfig,
    pub user: UserConfig,
    pub runtime: RuntimeContext,
    pub vcs: FakeVcs,
    pub engine: FakeEngine,
    pub binaries: FakeBinaries,
    pub editor: FakeEditor,
    pub launcher: FakeLauncher,
    pub elevation: FakeElevation,
    pub install_roots: Vec<PathBuf>,
}

impl Fixture {
    /// Workspace checked out on `current` with `expected` as the expected branch.
    pub fn new(current: &str, expected: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::write(
            root.join(UPROJECT),
            format!(r#"{{"FileVersion": 3, "EngineAssociation": "{ENGINE_VERSION}"}}"#),
        )
        .unwrap();
        std::fs::create_dir_all(root.join("Config")).unwrap();
        std::fs::write(
            root.join("Config/DefaultGame.ini"),
            format!("[/Script/EngineSettings.GeneralProjectSettings]\nProjectVersion={PROJECT_VERSION}\n"),
        )
        .unwrap();
        std::fs::create_dir_all(root.join("Binaries")).unwrap();
        std::fs::write(root.join(CHECKSUM_FILE), "{\"head\": true}").unwrap();

        let journal = Journal::default();
        let mut config = project_config();
        config.git.expected_branch = expected.to_string();

        Self {
            vcs: FakeVcs::new(journal.clone(), root, current),
            engine: FakeEngine::new(journal.clone()),
            binaries: FakeBinaries {
                journal: journal.clone(),
                code: 0,
            },
            editor: FakeEditor {
                journal: journal.clone(),
                running: false,
            },
            launcher: FakeLauncher {
                journal: journal.clone(),
                association_ok: true,
            },
            elevation: FakeElevation {
                journal: journal.clone(),
                elevated: false,
                grants: true,
            },
            runtime: RuntimeContext::new(root, false, expected),
            user: UserConfig::default(),
            config,
            journal,
            install_roots: Vec::new(),
            temp,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn toolchain(&self) -> Toolchain<'_> {
        Toolchain {
            vcs: &self.vcs,
            engine: &self.engine,
            binaries: &self.binaries,
            editor: &self.editor,
            launcher: &self.launcher,
            elevation: &self.elevation,
        }
    }

    pub fn workspace(&self) -> Workspace<'_> {
        Workspace::new(&self.config, &self.user, &self.runtime, self.toolchain())
            .with_vcs_install_roots(self.install_roots.clone())
            .with_download_pages(false)
    }
}
