//! Binary artifact synchronization
//!
//! The checksum file is a version-controlled staleness oracle: its digest is
//! compared with the digest recorded after the last successful pull, and its
//! content is never interpreted. For a pinned (custom) project version the
//! file is read at that version's tag and put back to HEAD afterwards, on
//! every exit path.

use std::path::{Path, PathBuf};

use wsync_fs::checksum::{self, DigestCache};
use wsync_git::VersionControl;
use wsync_tools::BinaryStore;

use crate::project::VersionMarker;
use crate::{Error, Result};

/// What an artifact sync did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactOutcome {
    UpToDate,
    Pulled,
}

/// Keeps prebuilt binaries in step with the project version
pub struct ArtifactSyncCoordinator<'a> {
    vcs: &'a dyn VersionControl,
    store: &'a dyn BinaryStore,
    root: &'a Path,
    checksum_file: &'a Path,
}

impl<'a> ArtifactSyncCoordinator<'a> {
    /// `checksum_file` is relative to `root`.
    pub fn new(
        vcs: &'a dyn VersionControl,
        store: &'a dyn BinaryStore,
        root: &'a Path,
        checksum_file: &'a Path,
    ) -> Self {
        Self {
            vcs,
            store,
            root,
            checksum_file,
        }
    }

    /// Pull binaries for `marker` if the checksum file says they are stale.
    pub fn sync(&self, marker: &VersionMarker) -> Result<ArtifactOutcome> {
        let revision = marker.checksum_revision();
        tracing::debug!(revision, file = %self.checksum_file.display(), "Checking out checksum file");

        let result = self
            .vcs
            .checkout_file(self.checksum_file, revision)
            .map_err(Error::from)
            .and_then(|()| self.pull_if_stale(&marker.project_version));

        if marker.is_custom_version {
            let restored = self.vcs.checkout_file(self.checksum_file, "HEAD");
            match (&result, restored) {
                (_, Ok(())) => {}
                (Ok(_), Err(e)) => return Err(e.into()),
                (Err(_), Err(e)) => {
                    tracing::error!(error = %e, "Failed to restore the checksum file to HEAD")
                }
            }
        }
        result
    }

    /// Re-download binaries for `version` regardless of staleness.
    pub fn force_pull(&self, version: &str) -> Result<()> {
        let code = self.store.pull(version, true)?;
        if code != 0 {
            return Err(Error::BinariesPullFailed {
                version: version.to_string(),
            });
        }
        self.record_checksum()?;
        tracing::info!(version, "Binaries pulled");
        Ok(())
    }

    fn pull_if_stale(&self, version: &str) -> Result<ArtifactOutcome> {
        if !self.is_stale()? {
            tracing::info!(version, "Binaries are up to date");
            return Ok(ArtifactOutcome::UpToDate);
        }

        tracing::info!(version, "Pulling binaries");
        match self.store.pull(version, false)? {
            0 => {
                self.record_checksum()?;
                tracing::info!(version, "Binaries pulled");
                Ok(ArtifactOutcome::Pulled)
            }
            code if code < 0 => Err(Error::BinariesUserAction),
            code => Err(Error::BinariesCrashed { code }),
        }
    }

    fn checksum_path(&self) -> PathBuf {
        self.root.join(self.checksum_file)
    }

    fn cache(&self) -> DigestCache {
        DigestCache::binaries(self.root)
    }

    fn is_stale(&self) -> Result<bool> {
        let current = checksum::digest_file(&self.checksum_path())?;
        Ok(self.cache().is_stale(&current)?)
    }

    fn record_checksum(&self) -> Result<()> {
        let path = self.checksum_path();
        match checksum::digest_file(&path) {
            Ok(digest) => self.cache().record(&digest)?,
            Err(e) => tracing::warn!(error = %e, path = %path.display(), "Could not record binaries checksum"),
        }
        Ok(())
    }
}
