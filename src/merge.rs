//! C6 (merge half): a three-way merge of ancestor/current/incoming file
//! sets. Pure in-memory logic over path → digest maps; the object/commit/
//! working-directory plumbing around it lives in [`crate::repo`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// The result of merging three file sets: the merged set (using the
/// "keep current" fallback on every conflicting path) and the list of
/// conflicting paths, sorted for determinism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub merged: BTreeMap<PathBuf, String>,
    pub conflicts: Vec<PathBuf>,
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Three-way merges `ancestor`, `current` and `incoming` file sets per the
/// resolution table:
///
/// | a | c | i | outcome |
/// |---|---|---|---------|
/// | a=c=i | | | keep c |
/// | a=c, a≠i | | | take i (or delete if i absent) |
/// | a≠c, a=i | | | keep c (or delete if c absent) |
/// | c=i | | | keep c (converged change/deletion) |
/// | otherwise | | | CONFLICT, keep c as fallback |
pub fn three_way_merge(
    ancestor: &BTreeMap<PathBuf, String>,
    current: &BTreeMap<PathBuf, String>,
    incoming: &BTreeMap<PathBuf, String>,
) -> MergeOutcome {
    let mut paths: BTreeSet<&PathBuf> = BTreeSet::new();
    paths.extend(ancestor.keys());
    paths.extend(current.keys());
    paths.extend(incoming.keys());

    let mut merged = BTreeMap::new();
    let mut conflicts = Vec::new();

    for path in paths {
        let a = ancestor.get(path);
        let c = current.get(path);
        let i = incoming.get(path);

        if a == c && c == i {
            // a = c = i: keep current (equal to all three anyway).
            if let Some(v) = c {
                merged.insert(path.clone(), v.clone());
            }
        } else if a == c {
            // a = c, a != i (else the branch above would have fired):
            // incoming changed this path relative to the shared ancestor.
            if let Some(v) = i {
                merged.insert(path.clone(), v.clone());
            }
        } else if a == i {
            // a != c (excluded above), a = i: current changed this path.
            if let Some(v) = c {
                merged.insert(path.clone(), v.clone());
            }
        } else if c == i {
            // both sides converged on the same change (or deletion)
            // independently of the ancestor.
            if let Some(v) = c {
                merged.insert(path.clone(), v.clone());
            }
        } else {
            // irreconcilable: keep current as a fallback, flag the conflict.
            if let Some(v) = c {
                merged.insert(path.clone(), v.clone());
            }
            conflicts.push(path.clone());
        }
    }

    MergeOutcome { merged, conflicts }
}
