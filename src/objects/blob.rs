//! Blobs: opaque byte sequences with no header or framing. Identity is the
//! digest of the raw content, full stop — no `"blob <size>\0"`-style framing
//! before hashing.

use crate::error::Result;
use crate::hash::hash;
use crate::store::ObjectStore;
use std::fs;
use std::path::Path;

pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|e| crate::error::VoxError::io(path, e))?;
        Ok(Self { data })
    }

    pub fn digest(&self) -> String {
        hash(&self.data)
    }

    /// Hashes and stores the blob, returning its digest.
    pub fn save(&self, store: &ObjectStore) -> Result<String> {
        let digest = self.digest();
        store.put(&digest, &self.data)?;
        Ok(digest)
    }

    pub fn load(store: &ObjectStore, digest: &str) -> Result<Self> {
        Ok(Self {
            data: store.get(digest)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_roundtrips_content() {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path().join("objects"));

        let blob = Blob::new(b"hello".to_vec());
        let digest = blob.save(&store).unwrap();

        let loaded = Blob::load(&store, &digest).unwrap();
        assert_eq!(loaded.data, b"hello");
    }

    #[test]
    fn identity_is_digest_of_raw_content_with_no_framing() {
        let blob = Blob::new(b"hello".to_vec());
        assert_eq!(blob.digest(), hash(b"hello"));
    }
}
