//! Session packets and their canonical digest.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Sentinel `prev_hash` value for the first packet in a chain.
pub const GENESIS_MARKER: &str = "0";

/// One unit of application data anchored into an [`IntegrityChain`].
///
/// `data`, `timestamp`, and `session_id` are plain fields: the chain
/// does not freeze them after hashing, which is exactly why a later
/// scan can catch an edit to a non-terminal packet. `prev_hash` is the
/// exception: it is the link of the chain and is write-once.
///
/// [`IntegrityChain`]: crate::chain::IntegrityChain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Packet {
    /// Opaque payload bytes.
    pub data: Vec<u8>,
    /// Hex digest of the chain predecessor, [`GENESIS_MARKER`] for the
    /// first packet, or empty while unlinked. Write-once.
    prev_hash: String,
    /// Unix seconds at creation.
    pub timestamp: i64,
    /// Logical session this packet belongs to.
    pub session_id: String,
}

impl Packet {
    /// Create an unlinked packet. `prev_hash` starts empty and is
    /// populated by [`IntegrityChain::append`].
    ///
    /// [`IntegrityChain::append`]: crate::chain::IntegrityChain::append
    pub fn new(data: impl Into<Vec<u8>>, timestamp: i64, session_id: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            prev_hash: String::new(),
            timestamp,
            session_id: session_id.into(),
        }
    }

    /// The stored predecessor commitment (empty while unlinked).
    pub fn prev_hash(&self) -> &str {
        &self.prev_hash
    }

    /// Whether this packet has been linked into a chain.
    pub fn is_linked(&self) -> bool {
        !self.prev_hash.is_empty()
    }

    /// Set the predecessor commitment, once.
    ///
    /// A packet that already carries a `prev_hash` keeps it: a re-set
    /// attempt is a silent no-op, not an error.
    pub fn set_prev_hash(&mut self, hash: impl Into<String>) {
        if self.prev_hash.is_empty() {
            self.prev_hash = hash.into();
        }
    }

    /// SHA-256 digest over the canonical packet encoding
    /// `data ":" prev_hash ":" timestamp ":" session_id`, as lowercase
    /// hex. Recomputed from current field values on every call; the
    /// chain never caches this.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        hasher.update(b":");
        hasher.update(self.prev_hash.as_bytes());
        hasher.update(b":");
        hasher.update(self.timestamp.to_string().as_bytes());
        hasher.update(b":");
        hasher.update(self.session_id.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_canonical_encoding() {
        let mut packet = Packet::new(b"Test data".to_vec(), 1234567890, "SESSION123");
        packet.set_prev_hash("0");

        let expected = hex::encode(Sha256::digest(b"Test data:0:1234567890:SESSION123"));
        assert_eq!(packet.digest(), expected);
        assert_eq!(packet.digest().len(), 64); // SHA256 hex length
    }

    #[test]
    fn test_digest_changes_with_data() {
        let a = Packet::new(b"one".to_vec(), 100, "S");
        let b = Packet::new(b"two".to_vec(), 100, "S");
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_new_packet_is_unlinked() {
        let packet = Packet::new(b"payload".to_vec(), 100, "S");
        assert!(!packet.is_linked());
        assert_eq!(packet.prev_hash(), "");
    }

    #[test]
    fn test_prev_hash_is_write_once() {
        let mut packet = Packet::new(b"payload".to_vec(), 100, "S");
        packet.set_prev_hash("abc123");
        assert_eq!(packet.prev_hash(), "abc123");

        packet.set_prev_hash("malicious");
        assert_eq!(packet.prev_hash(), "abc123");
    }

    #[test]
    fn test_digest_tracks_current_fields() {
        let mut packet = Packet::new(b"payload".to_vec(), 100, "S");
        packet.set_prev_hash(GENESIS_MARKER);
        let before = packet.digest();

        packet.data = b"edited".to_vec();
        assert_ne!(packet.digest(), before);
    }
}
