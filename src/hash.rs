//! C1: the hasher. A single operation — SHA-1 over a byte sequence, rendered
//! as lowercase 40-hex. No errors: hashing never fails.

use sha1::{Digest, Sha1};

pub const DIGEST_LEN: usize = 40;

/// Hashes `bytes` and returns the lowercase 40-hex digest.
pub fn hash(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// True if `s` looks like a well-formed digest: 40 lowercase hex characters.
pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_LEN && s.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
}
