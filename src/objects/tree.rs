//! C4: the tree codec. Converts a flat path → blob-digest map into a nested
//! hierarchy of tree objects and back.
//!
//! Starts from the flat staging map the index already holds, and serializes
//! each directory as plain `"<mode> <kind> <digest> <name>\n"` lines.
//! Directories are built as an explicit `Node` tree (`File`/`Dir`) and
//! serialized post-order: a subdirectory's digest is always known by the
//! time its parent is serialized, because the parent is only visited after
//! recursing into it.

use crate::error::{Result, VoxError};
use crate::hash::{hash, DIGEST_LEN};
use crate::store::ObjectStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const PERM_FILE: &str = "100644";
pub const PERM_DIR: &str = "40000";
pub const KIND_BLOB: &str = "blob";
pub const KIND_TREE: &str = "tree";

/// One line of a tree object: `<mode> <kind> <digest> <name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: String,
    pub kind: String,
    pub digest: String,
    pub name: String,
}

enum Node {
    File(String),
    Dir(BTreeMap<String, Node>),
}

/// Serializes `files` into a hierarchy of tree objects, storing every
/// intermediate and root tree along the way, and returns the root tree's
/// digest. Returns the empty string if `files` is empty.
pub fn build(store: &ObjectStore, files: &BTreeMap<PathBuf, String>) -> Result<String> {
    if files.is_empty() {
        return Ok(String::new());
    }

    let mut root: BTreeMap<String, Node> = BTreeMap::new();
    for (path, digest) in files {
        insert_path(&mut root, path, digest.clone());
    }

    serialize_dir(store, &root)
}

fn insert_path(root: &mut BTreeMap<String, Node>, path: &Path, digest: String) {
    let components: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    insert_components(root, &components, digest);
}

fn insert_components(dir: &mut BTreeMap<String, Node>, components: &[String], digest: String) {
    match components.split_first() {
        None => {}
        Some((name, rest)) if rest.is_empty() => {
            dir.insert(name.clone(), Node::File(digest));
        }
        Some((name, rest)) => {
            let entry = dir
                .entry(name.clone())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            if let Node::Dir(sub) = entry {
                insert_components(sub, rest, digest);
            }
        }
    }
}

/// Serializes one directory level, recursing into subdirectories first so
/// their digests are known, then emits blob lines before subtree lines as
/// the format requires.
fn serialize_dir(store: &ObjectStore, dir: &BTreeMap<String, Node>) -> Result<String> {
    let mut file_lines = Vec::new();
    let mut subtree_lines = Vec::new();

    for (name, node) in dir {
        match node {
            Node::File(digest) => {
                file_lines.push(format!("{} {} {} {}\n", PERM_FILE, KIND_BLOB, digest, name));
            }
            Node::Dir(sub) => {
                let digest = serialize_dir(store, sub)?;
                subtree_lines.push(format!("{} {} {} {}\n", PERM_DIR, KIND_TREE, digest, name));
            }
        }
    }

    let mut content = String::new();
    for line in file_lines {
        content.push_str(&line);
    }
    for line in subtree_lines {
        content.push_str(&line);
    }

    let digest = hash(content.as_bytes());
    store.put(&digest, content.as_bytes())?;
    Ok(digest)
}

/// Recursively walks a tree object, collecting `base / name` → digest for
/// every blob entry reached, and recursing into every subtree entry.
pub fn list(store: &ObjectStore, tree_digest: &str, base: &Path) -> Result<BTreeMap<PathBuf, String>> {
    let mut out = BTreeMap::new();
    if tree_digest.is_empty() {
        return Ok(out);
    }
    list_into(store, tree_digest, base, &mut out)?;
    Ok(out)
}

fn list_into(
    store: &ObjectStore,
    tree_digest: &str,
    base: &Path,
    out: &mut BTreeMap<PathBuf, String>,
) -> Result<()> {
    let entries = parse_entries(store, tree_digest)?;
    for entry in entries {
        let path = if base.as_os_str().is_empty() {
            PathBuf::from(&entry.name)
        } else {
            base.join(&entry.name)
        };

        match entry.kind.as_str() {
            KIND_BLOB => {
                out.insert(path, entry.digest);
            }
            KIND_TREE => {
                list_into(store, &entry.digest, &path, out)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Reads and parses a tree object's entries, tolerating (skipping) any line
/// that doesn't conform to the `<mode> <kind> <digest> <name>` shape.
pub fn parse_entries(store: &ObjectStore, tree_digest: &str) -> Result<Vec<TreeEntry>> {
    let bytes = store.get(tree_digest)?;
    let text = String::from_utf8(bytes).map_err(|_| VoxError::Malformed {
        digest: tree_digest.to_string(),
        reason: "tree object is not valid UTF-8".to_string(),
    })?;

    Ok(text.lines().filter_map(parse_line).collect())
}

fn parse_line(line: &str) -> Option<TreeEntry> {
    let (mode, rest) = line.split_once(' ')?;
    let (kind, rest) = rest.split_once(' ')?;

    if rest.len() < DIGEST_LEN + 1 {
        return None;
    }
    let digest = &rest[..DIGEST_LEN];
    if rest.as_bytes().get(DIGEST_LEN) != Some(&b' ') {
        return None;
    }
    let name = &rest[DIGEST_LEN + 1..];
    if name.is_empty() {
        return None;
    }

    Some(TreeEntry {
        mode: mode.to_string(),
        kind: kind.to_string(),
        digest: digest.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempdir().unwrap();
        let store = ObjectStore::new(dir.path().join("objects"));
        (dir, store)
    }

    #[test]
    fn empty_files_build_to_empty_digest() {
        let (_dir, store) = store();
        let digest = build(&store, &BTreeMap::new()).unwrap();
        assert_eq!(digest, "");
        assert_eq!(list(&store, &digest, Path::new("")).unwrap(), BTreeMap::new());
    }

    #[test]
    fn single_root_file_roundtrips() {
        let (_dir, store) = store();
        let mut files = BTreeMap::new();
        let h = "a".repeat(40);
        files.insert(PathBuf::from("a.txt"), h.clone());

        let root = build(&store, &files).unwrap();
        let listed = list(&store, &root, Path::new("")).unwrap();
        assert_eq!(listed, files);
    }

    #[test]
    fn nested_tree_build_matches_spec_scenario_2() {
        let (_dir, store) = store();
        let h1 = "1".repeat(40);
        let h2 = "2".repeat(40);
        let h3 = "3".repeat(40);

        let mut files = BTreeMap::new();
        files.insert(PathBuf::from("a.txt"), h1.clone());
        files.insert(PathBuf::from("src/b.txt"), h2.clone());
        files.insert(PathBuf::from("src/lib/c.txt"), h3.clone());

        let root_digest = build(&store, &files).unwrap();

        let root_entries = parse_entries(&store, &root_digest).unwrap();
        assert_eq!(root_entries.len(), 2);
        let root_blob = root_entries.iter().find(|e| e.kind == KIND_BLOB).unwrap();
        assert_eq!(root_blob.name, "a.txt");
        assert_eq!(root_blob.digest, h1);
        let root_subtree = root_entries.iter().find(|e| e.kind == KIND_TREE).unwrap();
        assert_eq!(root_subtree.name, "src");

        let src_entries = parse_entries(&store, &root_subtree.digest).unwrap();
        assert_eq!(src_entries.len(), 2);
        let src_blob = src_entries.iter().find(|e| e.kind == KIND_BLOB).unwrap();
        assert_eq!(src_blob.name, "b.txt");
        assert_eq!(src_blob.digest, h2);
        let lib_subtree = src_entries.iter().find(|e| e.kind == KIND_TREE).unwrap();
        assert_eq!(lib_subtree.name, "lib");

        let lib_entries = parse_entries(&store, &lib_subtree.digest).unwrap();
        assert_eq!(lib_entries.len(), 1);
        assert_eq!(lib_entries[0].name, "c.txt");
        assert_eq!(lib_entries[0].digest, h3);

        let listed = list(&store, &root_digest, Path::new("")).unwrap();
        assert_eq!(listed, files);
    }

    #[test]
    fn blob_lines_precede_subtree_lines_in_serialized_text() {
        let (_dir, store) = store();
        let mut files = BTreeMap::new();
        files.insert(PathBuf::from("z.txt"), "1".repeat(40));
        files.insert(PathBuf::from("a_dir/file.txt"), "2".repeat(40));

        let root_digest = build(&store, &files).unwrap();
        let text = String::from_utf8(store.get(&root_digest).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(" blob "));
        assert!(lines[1].contains(" tree "));
    }

    #[test]
    fn list_skips_non_conforming_lines() {
        let (_dir, store) = store();
        let text = format!(
            "garbage line\n{} {} {} ok.txt\n",
            PERM_FILE,
            KIND_BLOB,
            "a".repeat(40)
        );
        let digest = hash(text.as_bytes());
        store.put(&digest, text.as_bytes()).unwrap();

        let listed = list(&store, &digest, Path::new("")).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.get(Path::new("ok.txt")).unwrap(), &"a".repeat(40));
    }

    #[test]
    fn reserializing_a_tree_reproduces_its_own_digest() {
        let (_dir, store) = store();
        let mut files = BTreeMap::new();
        files.insert(PathBuf::from("a.txt"), "1".repeat(40));
        files.insert(PathBuf::from("dir/b.txt"), "2".repeat(40));

        let root_digest = build(&store, &files).unwrap();
        let bytes = store.get(&root_digest).unwrap();
        assert_eq!(hash(&bytes), root_digest);
    }
}
