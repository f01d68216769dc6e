//! C3: the index (staging area). A path → blob-digest map, persisted as a
//! flat text file, one `path<SP>digest` line per entry. No stat-cache
//! metadata (mtime, size, stage number) — just the map the tree codec needs.

use crate::error::{Result, VoxError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The staging area: a path → blob-digest map, rewritten in full on every
/// update. Iteration order is unspecified by the format but this
/// implementation always serializes sorted by path for consistent,
/// diffable output.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Index {
    entries: BTreeMap<PathBuf, String>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: BTreeMap<PathBuf, String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &BTreeMap<PathBuf, String> {
        &self.entries
    }

    pub fn into_entries(self) -> BTreeMap<PathBuf, String> {
        self.entries
    }

    pub fn get(&self, path: &Path) -> Option<&String> {
        self.entries.get(path)
    }

    pub fn stage(&mut self, path: impl Into<PathBuf>, digest: impl Into<String>) {
        self.entries.insert(path.into(), digest.into());
    }

    pub fn unstage(&mut self, path: &Path) -> Option<String> {
        self.entries.remove(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Populates the staging map from the on-disk index file. An absent file
    /// is an empty map, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|e| VoxError::io(path, e))?;
        let mut entries = BTreeMap::new();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            // Splits on the first space only: paths containing spaces are
            // not supported by this format (see DESIGN.md's open-question
            // resolution).
            if let Some((p, digest)) = line.split_once(' ') {
                entries.insert(PathBuf::from(p), digest.to_string());
            }
        }

        Ok(Self { entries })
    }

    /// Truncates and rewrites the on-disk index file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| VoxError::io(parent, e))?;
            }
        }

        let mut content = String::new();
        for (p, digest) in &self.entries {
            content.push_str(&p.to_string_lossy());
            content.push(' ');
            content.push_str(digest);
            content.push('\n');
        }

        fs::write(path, content).map_err(|e| VoxError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loading_an_absent_index_file_is_empty_not_an_error() {
        let dir = tempdir().unwrap();
        let index = Index::load(&dir.path().join("index")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn stage_then_save_then_load_roundtrips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index");

        let mut index = Index::new();
        index.stage("a.txt", "a".repeat(40));
        index.stage("src/b.txt", "b".repeat(40));
        index.save(&path).unwrap();

        let loaded = Index::load(&path).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn saved_entries_are_sorted_by_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index");

        let mut index = Index::new();
        index.stage("z.txt", "1".repeat(40));
        index.stage("a.txt", "2".repeat(40));
        index.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("a.txt "));
        assert!(lines[1].starts_with("z.txt "));
    }

    #[test]
    fn unstage_removes_entry() {
        let mut index = Index::new();
        index.stage("a.txt", "a".repeat(40));
        assert!(index.unstage(Path::new("a.txt")).is_some());
        assert!(index.get(Path::new("a.txt")).is_none());
    }
}
