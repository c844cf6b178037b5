//! Content-hash dedup index
//!
//! A "seen" set keyed by the SHA-256 digest of a canonical byte string.
//! Entries are added and never removed; memory grows with distinct items
//! seen over a crawl's lifetime, which is acceptable because a session is
//! bounded by the frontier's link-count and elapsed-time limits.
//!
//! Two independent instances exist per session: one for link identities
//! (keyed by the normalized absolute URL) and one for extracted records
//! (keyed by the record text).

use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// A seen-set over content hashes
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: HashSet<String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the canonical digest for a piece of text
    pub fn digest(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn seen(&self, digest: &str) -> bool {
        self.seen.contains(digest)
    }

    pub fn mark_seen(&mut self, digest: String) {
        self.seen.insert(digest);
    }

    /// Digests `text` and marks it seen, returning true exactly once per
    /// distinct text.
    pub fn first_sighting(&mut self, text: &str) -> bool {
        self.seen.insert(Self::digest(text))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
