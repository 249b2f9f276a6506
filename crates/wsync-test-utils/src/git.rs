//! Git repository fixtures.
//!
//! Choose the lowest-realism fixture that satisfies your test's needs —
//! fakes are faster and have fewer external dependencies.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Run `git` in `path`, panicking with stderr on failure.
pub fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Initialises a real git repository using `git2` (no initial commit, no config).
///
/// Realism level: **REAL** — valid git object store, empty history.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

fn configure_identity(path: &Path) {
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);
}

/// Initialises a real git repository with an initial commit using the `git` CLI.
///
/// Realism level: **REAL WITH HISTORY** — valid git state, `main` branch, one
/// commit in history containing `README.md`.
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path) {
    git(path, &["init"]);
    configure_identity(path);

    fs::write(path.join("README.md"), "# Test")
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: failed to write README.md: {e}"));

    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
    git(path, &["branch", "-M", "main"]);
}

/// Commit `content` to `file` in the repository at `path`.
pub fn commit_file(path: &Path, file: &str, content: &str, message: &str) {
    let target = path.join(file);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&target, content).unwrap();
    git(path, &["add", file]);
    git(path, &["commit", "-m", message]);
}

/// A bare `origin` plus a working clone of it, both in one temp directory.
///
/// Realism level: **REAL WITH REMOTE** — the clone tracks `origin/main`.
pub struct ClonedRepo {
    _temp: TempDir,
    pub origin: PathBuf,
    pub clone: PathBuf,
}

impl ClonedRepo {
    /// Create the pair. The seed commit contains `README.md`.
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let seed = temp.path().join("seed");
        let origin = temp.path().join("origin.git");
        let clone = temp.path().join("clone");
        fs::create_dir_all(&seed).unwrap();

        real_git_repo_with_commit(&seed);
        git(
            temp.path(),
            &["clone", "--bare", "seed", "origin.git"],
        );
        git(temp.path(), &["clone", "origin.git", "clone"]);
        configure_identity(&clone);

        Self {
            _temp: temp,
            origin,
            clone,
        }
    }

    /// Push a new commit to `origin` from a scratch clone.
    pub fn push_upstream(&self, file: &str, content: &str) {
        let scratch = self.origin.with_file_name("scratch");
        if !scratch.exists() {
            git(
                self.origin.parent().unwrap(),
                &["clone", "origin.git", "scratch"],
            );
            configure_identity(&scratch);
        }
        git(&scratch, &["pull", "--ff-only"]);
        commit_file(&scratch, file, content, "upstream change");
        git(&scratch, &["push", "origin", "HEAD:main"]);
    }
}

impl Default for ClonedRepo {
    fn default() -> Self {
        Self::new()
    }
}
