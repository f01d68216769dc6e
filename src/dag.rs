//! C5 (DAG half): common-ancestor search over the commit parent graph.
//!
//! A true lowest-common-ancestor search (mark all ancestors of `a`, then BFS
//! from `b` for the first marked node) would visit fewer nodes, but callers
//! observe the exact interleaved, alternating BFS described below, so that is
//! what is implemented — with per-call memoization of parsed commits, since
//! the two frontiers frequently revisit the same node from opposite sides.

use crate::objects::commit::Commit;
use crate::store::ObjectStore;
use std::collections::{HashMap, HashSet, VecDeque};

/// Finds a commit reachable from both `a` and `b` by alternating
/// breadth-first expansion from each, returning as soon as one frontier's
/// node is found in the other's reachability set. Returns `""` if the two
/// histories share no ancestor.
///
/// The result is not guaranteed to be the lowest common ancestor in the
/// DAG-theoretic sense — it is merely the first node discovered to belong to
/// both reachability sets under this particular interleaving.
pub fn ancestor(store: &ObjectStore, a: &str, b: &str) -> crate::error::Result<String> {
    let mut cache: HashMap<String, Vec<String>> = HashMap::new();

    let mut queue_a: VecDeque<String> = VecDeque::from([a.to_string()]);
    let mut queue_b: VecDeque<String> = VecDeque::from([b.to_string()]);
    let mut reach_a: HashSet<String> = HashSet::from([a.to_string()]);
    let mut reach_b: HashSet<String> = HashSet::from([b.to_string()]);

    while !queue_a.is_empty() || !queue_b.is_empty() {
        if let Some(node) = queue_a.pop_front() {
            if reach_b.contains(&node) {
                return Ok(node);
            }
            for parent in parents_of(store, &mut cache, &node)? {
                if reach_a.insert(parent.clone()) {
                    queue_a.push_back(parent);
                }
            }
        }

        if let Some(node) = queue_b.pop_front() {
            if reach_a.contains(&node) {
                return Ok(node);
            }
            for parent in parents_of(store, &mut cache, &node)? {
                if reach_b.insert(parent.clone()) {
                    queue_b.push_back(parent);
                }
            }
        }
    }

    Ok(String::new())
}

fn parents_of(
    store: &ObjectStore,
    cache: &mut HashMap<String, Vec<String>>,
    digest: &str,
) -> crate::error::Result<Vec<String>> {
    if let Some(parents) = cache.get(digest) {
        return Ok(parents.clone());
    }
    let commit = Commit::load(store, digest)?;
    cache.insert(digest.to_string(), commit.parents.clone());
    Ok(commit.parents)
}
