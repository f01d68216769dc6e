//! A1: the repository handle. Aggregates the metadata directory, the object
//! store, and the staging index behind one owned struct, and exposes every
//! C1-C6 operation as a method on it instead of free functions closing over
//! process-wide statics. A single handle is constructed once per command
//! invocation via [`Repository::init`] or [`Repository::open`], the latter
//! walking up from the current directory to find the repository root.

use crate::error::{Result, VoxError};
use crate::hash;
use crate::index::Index;
use crate::objects::blob::Blob;
use crate::objects::commit::Commit;
use crate::objects::tree;
use crate::refs;
use crate::store::ObjectStore;
use crate::{merge, workdir};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const META_DIR_NAME: &str = ".vox";

pub struct Repository {
    workdir: PathBuf,
    meta_dir: PathBuf,
    store: ObjectStore,
    index: Index,
    index_path: PathBuf,
}

impl Repository {
    /// Scaffolds a new repository at `workdir`: `.vox/objects`,
    /// `.vox/refs/heads`, a `HEAD` pointing at `refs/heads/main`, and an
    /// empty index.
    pub fn init(workdir: impl Into<PathBuf>) -> Result<Self> {
        let workdir = workdir.into();
        let meta_dir = workdir.join(META_DIR_NAME);

        fs::create_dir_all(meta_dir.join("objects")).map_err(|e| VoxError::io(&meta_dir, e))?;
        fs::create_dir_all(meta_dir.join("refs").join("heads"))
            .map_err(|e| VoxError::io(&meta_dir, e))?;
        refs::set_head_to_branch(&meta_dir, "main")?;

        let index_path = meta_dir.join("index");
        let index = Index::new();
        index.save(&index_path)?;

        Ok(Self {
            store: ObjectStore::new(meta_dir.join("objects")),
            workdir,
            meta_dir,
            index,
            index_path,
        })
    }

    /// Locates an existing repository at or above `start` and loads its
    /// index.
    pub fn open(start: impl Into<PathBuf>) -> Result<Self> {
        let workdir = Self::discover(&start.into())?;
        let meta_dir = workdir.join(META_DIR_NAME);
        let store = ObjectStore::new(meta_dir.join("objects"));
        let index_path = meta_dir.join("index");
        let index = Index::load(&index_path)?;

        Ok(Self {
            workdir,
            meta_dir,
            store,
            index,
            index_path,
        })
    }

    fn discover(start: &Path) -> Result<PathBuf> {
        let mut current = if start.is_absolute() {
            start.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| VoxError::io(start, e))?
                .join(start)
        };
        loop {
            if current.join(META_DIR_NAME).is_dir() {
                return Ok(current);
            }
            if !current.pop() {
                return Err(VoxError::io(
                    start,
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "not a vox repository (or any parent)",
                    ),
                ));
            }
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn meta_dir(&self) -> &Path {
        &self.meta_dir
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Stages `paths` (each relative to the working directory root) into the
    /// index and persists it. A directory argument is staged recursively,
    /// skipping the metadata directory.
    pub fn add(&mut self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            self.add_path(path)?;
        }
        self.index.save(&self.index_path)
    }

    fn add_path(&mut self, path: &Path) -> Result<()> {
        let absolute = self.workdir.join(path);

        if absolute.is_file() {
            self.stage_file(path, &absolute)?;
        } else if absolute.is_dir() {
            let meta_dir = self.meta_dir.clone();
            let files: Vec<PathBuf> = WalkDir::new(&absolute)
                .min_depth(1)
                .into_iter()
                .filter_entry(move |e| e.path() != meta_dir)
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.path().to_path_buf())
                .collect();

            for file_abs in files {
                let relative = file_abs
                    .strip_prefix(&self.workdir)
                    .unwrap_or(&file_abs)
                    .to_path_buf();
                self.stage_file(&relative, &file_abs)?;
            }
        } else {
            return Err(VoxError::io(
                &absolute,
                std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
            ));
        }

        Ok(())
    }

    fn stage_file(&mut self, relative: &Path, absolute: &Path) -> Result<()> {
        let digest = Blob::from_file(absolute)?.save(&self.store)?;
        debug!("staged {} as {digest}", relative.display());
        self.index.stage(relative.to_path_buf(), digest);
        Ok(())
    }

    /// Builds a tree from the current index, commits it with `identity` as
    /// both author and committer, and advances HEAD.
    pub fn commit(&mut self, identity: &str, message: &str) -> Result<String> {
        let tree_digest = tree::build(&self.store, self.index.entries())?;
        let parents = refs::head_commit(&self.meta_dir)?.into_iter().collect();

        let commit = Commit::authored_by(tree_digest, parents, identity, message);
        let digest = commit.save(&self.store)?;
        refs::advance_head(&self.meta_dir, &digest)?;
        Ok(digest)
    }

    /// Walks the commit history from HEAD, newest first, following each
    /// commit's first parent. `limit` caps how many commits are returned.
    pub fn log(&self, limit: Option<usize>) -> Result<Vec<(String, Commit)>> {
        let mut out = Vec::new();
        let mut current = refs::head_commit(&self.meta_dir)?;

        while let Some(digest) = current {
            if let Some(limit) = limit {
                if out.len() >= limit {
                    break;
                }
            }
            let commit = Commit::load(&self.store, &digest)?;
            current = commit.parents.first().cloned();
            out.push((digest, commit));
        }

        Ok(out)
    }

    /// Creates a branch pointing at the current HEAD commit.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        let head = refs::head_commit(&self.meta_dir)?.ok_or(VoxError::EmptyHead)?;
        refs::write_branch(&self.meta_dir, name, &head)
    }

    pub fn delete_branch(&self, name: &str) -> Result<()> {
        refs::delete_branch(&self.meta_dir, name)
    }

    pub fn list_branches(&self) -> Result<Vec<(String, String)>> {
        refs::list_branches(&self.meta_dir)
    }

    pub fn current_branch(&self) -> Result<Option<String>> {
        refs::current_branch_name(&self.meta_dir)
    }

    /// Resolves `target` (a branch name, or a bare commit digest for a
    /// detached checkout) and reconciles the working tree and index to it.
    pub fn checkout(&mut self, target: &str) -> Result<()> {
        let commit_digest = if let Some(digest) = refs::read_branch(&self.meta_dir, target)? {
            digest
        } else if hash::is_digest(target) && self.store.contains(target) {
            target.to_string()
        } else {
            return Err(VoxError::UnknownBranch {
                name: target.to_string(),
            });
        };

        let commit = Commit::load(&self.store, &commit_digest)?;
        let target_files = tree::list(&self.store, &commit.tree, Path::new(""))?;

        workdir::reconcile(&self.workdir, &self.meta_dir, &self.store, &target_files)?;
        self.index = Index::from_map(target_files);
        self.index.save(&self.index_path)?;

        if refs::read_branch(&self.meta_dir, target)?.is_some() {
            refs::set_head_to_branch(&self.meta_dir, target)?;
        } else {
            refs::set_head_detached(&self.meta_dir, &commit_digest)?;
        }

        Ok(())
    }

    /// Three-way merges `branch_name` into the current HEAD. On success,
    /// returns the new merge commit's digest. On conflict, the working tree
    /// and index are updated to the fallback merged set and
    /// `VoxError::Conflicted` is returned with no commit created.
    pub fn merge(&mut self, identity: &str, branch_name: &str) -> Result<String> {
        let current_digest = refs::head_commit(&self.meta_dir)?.ok_or(VoxError::EmptyHead)?;
        let incoming_digest = refs::read_branch(&self.meta_dir, branch_name)?.ok_or_else(|| {
            VoxError::UnknownBranch {
                name: branch_name.to_string(),
            }
        })?;

        if current_digest == incoming_digest {
            return Err(VoxError::AlreadyUpToDate);
        }

        let ancestor_digest = crate::dag::ancestor(&self.store, &current_digest, &incoming_digest)?;
        if ancestor_digest.is_empty() {
            return Err(VoxError::NoCommonAncestor {
                a: current_digest,
                b: incoming_digest,
            });
        }
        debug!("merge base: {ancestor_digest}");

        let ancestor_tree = Commit::load(&self.store, &ancestor_digest)?.tree;
        let current_tree = Commit::load(&self.store, &current_digest)?.tree;
        let incoming_tree = Commit::load(&self.store, &incoming_digest)?.tree;

        let ancestor_files = tree::list(&self.store, &ancestor_tree, Path::new(""))?;
        let current_files = tree::list(&self.store, &current_tree, Path::new(""))?;
        let incoming_files = tree::list(&self.store, &incoming_tree, Path::new(""))?;

        let outcome = merge::three_way_merge(&ancestor_files, &current_files, &incoming_files);

        workdir::reconcile(&self.workdir, &self.meta_dir, &self.store, &outcome.merged)?;
        self.index = Index::from_map(outcome.merged.clone());
        self.index.save(&self.index_path)?;

        if outcome.has_conflicts() {
            return Err(VoxError::Conflicted {
                paths: outcome
                    .conflicts
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
            });
        }

        let tree_digest = tree::build(&self.store, &outcome.merged)?;
        let message = match refs::current_branch_name(&self.meta_dir)? {
            Some(current_name) => format!("Merge branch '{branch_name}' into {current_name}"),
            None => format!("Merge branch '{branch_name}'"),
        };
        let commit = Commit::authored_by(
            tree_digest,
            vec![current_digest, incoming_digest],
            identity,
            message,
        );
        let digest = commit.save(&self.store)?;
        refs::advance_head(&self.meta_dir, &digest)?;
        Ok(digest)
    }
}
