//! Error kinds surfaced by the vox core.
//!
//! Every public operation on [`crate::repo::Repository`], [`crate::store::ObjectStore`],
//! [`crate::index::Index`], the tree codec and the merge engine returns
//! `Result<T, VoxError>`. The CLI layer converts these into `anyhow::Error`
//! at the boundary and owns presentation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoxError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("object not found: {digest}")]
    NotFound { digest: String },

    #[error("malformed object {digest}: {reason}")]
    Malformed { digest: String, reason: String },

    #[error("branch '{name}' does not exist")]
    UnknownBranch { name: String },

    #[error("current branch has no commits yet")]
    EmptyHead,

    #[error("already up to date")]
    AlreadyUpToDate,

    #[error("no common ancestor between {a} and {b}")]
    NoCommonAncestor { a: String, b: String },

    #[error("merge conflict in {} path(s): {}", .paths.len(), .paths.join(", "))]
    Conflicted { paths: Vec<String> },
}

pub type Result<T> = std::result::Result<T, VoxError>;

impl VoxError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VoxError::Io {
            path: path.into(),
            source,
        }
    }
}
