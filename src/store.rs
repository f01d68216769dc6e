//! C2: the object store. Content-addressed byte sequences keyed by digest,
//! sharded by the first two hex characters. Objects are stored as raw,
//! unframed bytes — no zlib wrapping, no header.

use crate::error::{Result, VoxError};
use std::fs;
use std::path::{Path, PathBuf};

/// A sharded, content-addressed object store rooted at `objects/` inside a
/// repository's metadata directory.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn shard_path(&self, digest: &str) -> PathBuf {
        self.root.join(&digest[0..2]).join(&digest[2..])
    }

    /// Writes `bytes` under `digest`. Overwriting an existing object with
    /// identical content is idempotent; the caller owns the
    /// `hash(bytes) == digest` invariant, the store does not check it.
    pub fn put(&self, digest: &str, bytes: &[u8]) -> Result<()> {
        let path = self.shard_path(digest);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| VoxError::io(parent, e))?;
        }
        fs::write(&path, bytes).map_err(|e| VoxError::io(&path, e))
    }

    /// Reads back the bytes stored under `digest`.
    pub fn get(&self, digest: &str) -> Result<Vec<u8>> {
        let path = self.shard_path(digest);
        fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VoxError::NotFound {
                    digest: digest.to_string(),
                }
            } else {
                VoxError::io(&path, e)
            }
        })
    }

    /// Existence check without reading content.
    pub fn contains(&self, digest: &str) -> bool {
        self.shard_path(digest).is_file()
    }
}
