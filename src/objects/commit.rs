//! C5 (codec half): commit objects — a `tree` line, zero or more `parent`
//! lines, separate `author` and `committer` lines, and a message.
//!
//! `Commit` carries concrete `author_time`/`committer_time` fields that
//! `parse` fills from the object text and `save` never overwrites, so a
//! loaded-then-resaved commit keeps its original timestamps (see DESIGN.md).

use crate::error::{Result, VoxError};
use crate::hash::hash;
use crate::store::ObjectStore;
use chrono::Utc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub tree: String,
    pub parents: Vec<String>,
    pub author: String,
    pub author_time: i64,
    pub committer: String,
    pub committer_time: i64,
    pub message: String,
}

impl Commit {
    /// Builds a freshly authored commit, stamped with the current
    /// wall-clock second count for both author and committer.
    pub fn new(
        tree: impl Into<String>,
        parents: Vec<String>,
        author: impl Into<String>,
        committer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            tree: tree.into(),
            parents,
            author: author.into(),
            author_time: now,
            committer: committer.into(),
            committer_time: now,
            message: message.into(),
        }
    }

    /// Convenience for the common case of a single author acting as both
    /// author and committer (the CLI's `commit` subcommand).
    pub fn authored_by(
        tree: impl Into<String>,
        parents: Vec<String>,
        identity: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let identity = identity.into();
        Self::new(tree, parents, identity.clone(), identity, message)
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut content = String::new();
        content.push_str(&format!("tree {}\n", self.tree));
        for parent in &self.parents {
            content.push_str(&format!("parent {}\n", parent));
        }
        content.push_str(&format!("author {} {}\n", self.author, self.author_time));
        content.push_str(&format!(
            "committer {} {}\n",
            self.committer, self.committer_time
        ));
        content.push('\n');
        content.push_str(&self.message);
        content.push('\n');
        content.into_bytes()
    }

    pub fn digest(&self) -> String {
        hash(&self.serialize())
    }

    pub fn save(&self, store: &ObjectStore) -> Result<String> {
        let digest = self.digest();
        store.put(&digest, &self.serialize())?;
        Ok(digest)
    }

    pub fn load(store: &ObjectStore, digest: &str) -> Result<Self> {
        let bytes = store.get(digest)?;
        let text = String::from_utf8(bytes).map_err(|_| VoxError::Malformed {
            digest: digest.to_string(),
            reason: "commit object is not valid UTF-8".to_string(),
        })?;
        Self::parse(digest, &text)
    }

    /// Parses the header lines (`tree`, `parent`, `author`, `committer`)
    /// followed by a blank line and the message. Unrecognized header lines
    /// are ignored for forward compatibility. A missing `tree` line is
    /// malformed.
    pub fn parse(digest: &str, content: &str) -> Result<Self> {
        let mut lines = content.lines();
        let mut tree: Option<String> = None;
        let mut parents = Vec::new();
        let mut author: Option<String> = None;
        let mut author_time: Option<i64> = None;
        let mut committer: Option<String> = None;
        let mut committer_time: Option<i64> = None;
        let mut message_lines: Vec<&str> = Vec::new();
        let mut reading_message = false;

        for line in &mut lines {
            if reading_message {
                message_lines.push(line);
                continue;
            }

            if line.is_empty() {
                reading_message = true;
                continue;
            }

            if let Some(value) = line.strip_prefix("tree ") {
                tree = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("parent ") {
                parents.push(value.to_string());
            } else if let Some(value) = line.strip_prefix("author ") {
                let (identity, timestamp) = split_identity_and_timestamp(value);
                author = Some(identity);
                author_time = Some(timestamp);
            } else if let Some(value) = line.strip_prefix("committer ") {
                let (identity, timestamp) = split_identity_and_timestamp(value);
                committer = Some(identity);
                committer_time = Some(timestamp);
            }
            // any other header line is ignored for forward compatibility
        }

        let tree = tree.ok_or_else(|| VoxError::Malformed {
            digest: digest.to_string(),
            reason: "missing tree line".to_string(),
        })?;

        let now = Utc::now().timestamp();
        let author = author.unwrap_or_else(|| "unknown <unknown@example.com>".to_string());
        let committer = committer.unwrap_or_else(|| author.clone());

        Ok(Self {
            tree,
            parents,
            author,
            author_time: author_time.unwrap_or(now),
            committer,
            committer_time: committer_time.unwrap_or(now),
            message: message_lines.join("\n"),
        })
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() >= 2
    }
}

/// Splits an `author`/`committer` value of the shape `Name <addr> <seconds>`
/// by finding the final `>`: everything up to and including it is the
/// identity, everything after is the timestamp token. Falls back to "now"
/// if no timestamp token was present or it failed to parse.
fn split_identity_and_timestamp(value: &str) -> (String, i64) {
    match value.rfind('>') {
        Some(idx) => {
            let identity = value[..=idx].to_string();
            let timestamp = value[idx + 1..]
                .trim()
                .parse::<i64>()
                .unwrap_or_else(|_| Utc::now().timestamp());
            (identity, timestamp)
        }
        None => (value.trim().to_string(), Utc::now().timestamp()),
    }
}
