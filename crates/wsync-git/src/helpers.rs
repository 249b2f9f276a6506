//! Shared git2 helper functions for reading repository state

use std::path::Path;

use git2::Repository;

use crate::Result;

/// Open the repository containing `path`.
pub fn open(path: &Path) -> Result<Repository> {
    Ok(Repository::discover(path)?)
}

/// Get the current branch name from a repository.
///
/// Returns the branch name if HEAD points to a branch, or `None` if HEAD is detached.
/// An unborn branch (no commits yet) is still reported by name.
pub fn get_current_branch(repo: &Repository) -> Result<Option<String>> {
    match repo.head() {
        Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
        Ok(_) => Ok(None),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
            let head = repo.find_reference("HEAD")?;
            Ok(head
                .symbolic_target()
                .and_then(|t| t.strip_prefix("refs/heads/"))
                .map(str::to_string))
        }
        Err(e) => Err(e.into()),
    }
}

/// URL of the named remote, if configured.
pub fn remote_url(repo: &Repository, name: &str) -> Result<Option<String>> {
    match repo.find_remote(name) {
        Ok(remote) => Ok(remote.url().map(str::to_string)),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All configured fetch refspecs of the named remote.
pub fn fetch_refspecs(repo: &Repository, remote: &str) -> Result<Vec<String>> {
    let config = repo.config()?.snapshot()?;
    let key = format!("remote.{remote}.fetch");
    let mut specs = Vec::new();
    let mut entries = config.multivar(&key, None)?;
    while let Some(entry) = entries.next() {
        let entry = entry?;
        if let Some(value) = entry.value() {
            specs.push(value.to_string());
        }
    }
    Ok(specs)
}
