//! Staleness digests
//!
//! A tracked file is reduced to a `sha256:<hex>` digest and compared with the
//! digest recorded after the last successful acquisition. The file's content
//! is never interpreted.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::constants::WorkspacePath;
use crate::{Error, Result, io};

const PREFIX: &str = "sha256:";

/// Digest of raw bytes.
pub fn digest_bytes(content: &[u8]) -> String {
    format!("{PREFIX}{:x}", Sha256::digest(content))
}

/// Digest of a file's bytes.
pub fn digest_file(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(digest_bytes(&content))
}

/// The last digest recorded for a tracked file
#[derive(Debug, Clone)]
pub struct DigestCache {
    path: PathBuf,
}

impl DigestCache {
    /// Cache of the binaries checksum file under `root`.
    pub fn binaries(root: &Path) -> Self {
        Self {
            path: WorkspacePath::BinariesChecksumCache.under(root),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The recorded digest, if any.
    pub fn recorded(&self) -> Result<Option<String>> {
        match io::read_text(&self.path) {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stale when nothing was recorded or the recorded digest differs.
    pub fn is_stale(&self, current: &str) -> Result<bool> {
        Ok(self.recorded()?.as_deref() != Some(current))
    }

    pub fn record(&self, digest: &str) -> Result<()> {
        io::write_text(&self.path, digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_known_value() {
        assert_eq!(
            digest_bytes(b"hello"),
            "sha256:2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn file_digest_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sum.json");
        std::fs::write(&path, b"{\"a\":1}").unwrap();
        assert_eq!(digest_file(&path).unwrap(), digest_bytes(b"{\"a\":1}"));
    }

    #[test]
    fn missing_file_keeps_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = digest_file(&dir.path().join("absent")).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn cache_is_stale_until_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DigestCache::binaries(dir.path());
        let digest = digest_bytes(b"v1");

        assert!(cache.is_stale(&digest).unwrap());
        cache.record(&digest).unwrap();
        assert!(!cache.is_stale(&digest).unwrap());
        assert!(cache.is_stale(&digest_bytes(b"v2")).unwrap());
        assert!(cache.path().ends_with(".wsync/binaries.checksum"));
    }
}
