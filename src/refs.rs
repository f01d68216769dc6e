//! A2: branch references and HEAD. A thin reference manager — only what the
//! merge engine and the CLI's `branch`/`checkout` commands need to resolve a
//! branch name to a commit digest. Free functions over an explicit
//! `meta_dir` rather than a global path, consistent with the
//! repository-handle design used throughout this crate.

use crate::error::{Result, VoxError};
use std::fs;
use std::path::{Path, PathBuf};

fn heads_dir(meta_dir: &Path) -> PathBuf {
    meta_dir.join("refs").join("heads")
}

fn branch_path(meta_dir: &Path, name: &str) -> PathBuf {
    heads_dir(meta_dir).join(name)
}

fn head_path(meta_dir: &Path) -> PathBuf {
    meta_dir.join("HEAD")
}

/// Reads the commit digest a branch points to, or `None` if the branch has
/// no ref file yet (a newly created branch that has never been committed
/// to, or simply an unknown name).
pub fn read_branch(meta_dir: &Path, name: &str) -> Result<Option<String>> {
    let path = branch_path(meta_dir, name);
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).map_err(|e| VoxError::io(&path, e))?;
    let digest = content.trim();
    if digest.is_empty() {
        Ok(None)
    } else {
        Ok(Some(digest.to_string()))
    }
}

/// Creates or advances a branch to point at `digest`.
pub fn write_branch(meta_dir: &Path, name: &str, digest: &str) -> Result<()> {
    let path = branch_path(meta_dir, name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| VoxError::io(parent, e))?;
    }
    fs::write(&path, format!("{digest}\n")).map_err(|e| VoxError::io(&path, e))
}

/// Deletes a branch ref file. Refuses to delete the currently checked-out
/// branch.
pub fn delete_branch(meta_dir: &Path, name: &str) -> Result<()> {
    let path = branch_path(meta_dir, name);
    if !path.is_file() {
        return Err(VoxError::UnknownBranch {
            name: name.to_string(),
        });
    }
    if current_branch_name(meta_dir)?.as_deref() == Some(name) {
        return Err(VoxError::Malformed {
            digest: name.to_string(),
            reason: "refusing to delete the currently checked-out branch".to_string(),
        });
    }
    fs::remove_file(&path).map_err(|e| VoxError::io(&path, e))
}

/// Lists every branch and the commit digest it points to, sorted by name.
pub fn list_branches(meta_dir: &Path) -> Result<Vec<(String, String)>> {
    let dir = heads_dir(meta_dir);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut branches = Vec::new();
    for entry in fs::read_dir(&dir).map_err(|e| VoxError::io(&dir, e))? {
        let entry = entry.map_err(|e| VoxError::io(&dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if let Some(digest) = read_branch(meta_dir, name)? {
                branches.push((name.to_string(), digest));
            }
        }
    }
    branches.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(branches)
}

/// The name of the currently checked-out branch, or `None` in a detached
/// HEAD state (HEAD holds a bare commit digest rather than a `ref: ` line).
pub fn current_branch_name(meta_dir: &Path) -> Result<Option<String>> {
    let path = head_path(meta_dir);
    let content = fs::read_to_string(&path).map_err(|e| VoxError::io(&path, e))?;
    Ok(content
        .trim()
        .strip_prefix("ref: refs/heads/")
        .map(|s| s.to_string()))
}

/// The commit digest HEAD currently resolves to, following one level of
/// `ref: ` indirection if present. `None` means the current branch exists
/// but has no commits yet (an empty-head state, not an error by itself).
pub fn head_commit(meta_dir: &Path) -> Result<Option<String>> {
    match current_branch_name(meta_dir)? {
        Some(branch) => read_branch(meta_dir, &branch),
        None => {
            let path = head_path(meta_dir);
            let content = fs::read_to_string(&path).map_err(|e| VoxError::io(&path, e))?;
            let digest = content.trim();
            if digest.is_empty() {
                Ok(None)
            } else {
                Ok(Some(digest.to_string()))
            }
        }
    }
}

/// Points HEAD at a branch by name (symbolic reference).
pub fn set_head_to_branch(meta_dir: &Path, name: &str) -> Result<()> {
    let path = head_path(meta_dir);
    fs::write(&path, format!("ref: refs/heads/{name}\n")).map_err(|e| VoxError::io(&path, e))
}

/// Points HEAD directly at a commit digest (detached HEAD state).
pub fn set_head_detached(meta_dir: &Path, digest: &str) -> Result<()> {
    let path = head_path(meta_dir);
    fs::write(&path, format!("{digest}\n")).map_err(|e| VoxError::io(&path, e))
}

/// Advances whatever HEAD currently points at (a branch, or a detached
/// commit) to `digest` — the final step of `commit` and `merge`.
pub fn advance_head(meta_dir: &Path, digest: &str) -> Result<()> {
    match current_branch_name(meta_dir)? {
        Some(branch) => write_branch(meta_dir, &branch, digest),
        None => set_head_detached(meta_dir, digest),
    }
}
