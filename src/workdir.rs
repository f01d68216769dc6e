//! C6 (working-directory half): clean-and-restore reconciliation of the
//! working tree against a target path → digest map.
//!
//! Skips the repository's own metadata directory, whatever it's named, and
//! walks the working tree once with `walkdir` rather than descending
//! directory-at-a-time, since there is no record of which directories the
//! *previous* tree touched, only of which files the *new* one wants.

use crate::error::{Result, VoxError};
use crate::hash::hash;
use crate::store::ObjectStore;
use log::warn;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reconciles `workdir` to contain exactly the files in `target`, leaving
/// `meta_dir` (the repository's own `.vox`-equivalent directory) untouched.
///
/// Four steps, run in order: clean untracked files, remove directories left
/// empty by the clean, restore every file in `target`, and (left to the
/// caller — see [`crate::repo::Repository`]) persist the new index.
pub fn reconcile(
    workdir: &Path,
    meta_dir: &Path,
    store: &ObjectStore,
    target: &BTreeMap<PathBuf, String>,
) -> Result<()> {
    clean(workdir, meta_dir, target)?;
    remove_empty_directories(workdir, meta_dir);
    restore(workdir, store, target)?;
    Ok(())
}

/// Step 1: remove every regular file under `workdir` whose path is not in
/// `target` and which does not live inside `meta_dir`. Per-file failures are
/// downgraded to warnings so one locked file cannot abort reconciliation.
fn clean(workdir: &Path, meta_dir: &Path, target: &BTreeMap<PathBuf, String>) -> Result<()> {
    let entries = WalkDir::new(workdir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| entry.path() != meta_dir);

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("failed to walk working directory entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(workdir) {
            Ok(r) => r.to_path_buf(),
            Err(_) => continue,
        };

        if target.contains_key(&relative) {
            continue;
        }

        if let Err(e) = fs::remove_file(entry.path()) {
            warn!("failed to remove untracked file {}: {e}", entry.path().display());
        }
    }

    Ok(())
}

/// Step 2: delete directories left empty by the clean, deepest first so a
/// child's removal can make its parent eligible too. Errors (non-empty,
/// permission denied) are ignored — they just mean the directory stays.
fn remove_empty_directories(workdir: &Path, meta_dir: &Path) {
    let mut dirs: Vec<PathBuf> = WalkDir::new(workdir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| entry.path() != meta_dir)
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().to_path_buf())
        .collect();

    dirs.sort_by_key(|p| std::cmp::Reverse(p.as_os_str().len()));

    for dir in dirs {
        let _ = fs::remove_dir(dir);
    }
}

/// Step 3: write every `(path, digest)` in `target` to the working
/// directory, creating parent directories as needed. A file already present
/// with matching content is left untouched, to avoid gratuitous mtime churn.
fn restore(workdir: &Path, store: &ObjectStore, target: &BTreeMap<PathBuf, String>) -> Result<()> {
    for (path, digest) in target {
        let abs = workdir.join(path);

        if file_already_matches(&abs, digest) {
            continue;
        }

        let data = store.get(digest)?;
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent).map_err(|e| VoxError::io(parent, e))?;
        }
        fs::write(&abs, &data).map_err(|e| VoxError::io(&abs, e))?;
    }
    Ok(())
}

fn file_already_matches(path: &Path, expected_digest: &str) -> bool {
    match fs::read(path) {
        Ok(content) => hash(&content) == expected_digest,
        Err(_) => false,
    }
}
