//! Append-only hash chain over session packets.

use std::ops::Index;
use std::slice;

use thiserror::Error;
use tideline_common::helpers::constant_time_eq;
use tracing::{debug, warn};

use crate::packet::{Packet, GENESIS_MARKER};

/// Where a verification scan found the chain inconsistent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("first packet does not carry the genesis marker")]
    GenesisMismatch,

    #[error("chain link broken at index {index}")]
    BrokenLink { index: usize },
}

impl From<ChainError> for tideline_common::Error {
    fn from(err: ChainError) -> Self {
        Self::protocol(err)
    }
}

/// Ordered, append-only log of [`Packet`]s for one session.
///
/// Each appended packet commits to the digest of the packet before it,
/// so editing any hashed field of a non-terminal packet is detectable
/// by a later [`verify`](IntegrityChain::verify) scan. Appends take
/// `&mut self`: exclusive access serializes the read-last/link/push
/// sequence, and `verify` runs against a chain no one is mutating.
#[derive(Debug, Clone)]
pub struct IntegrityChain {
    session_id: String,
    packets: Vec<Packet>,
}

impl IntegrityChain {
    /// Create an empty chain for a session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            packets: Vec::new(),
        }
    }

    /// The session this chain belongs to.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Link a packet to the current head and append it.
    ///
    /// The first packet is linked to [`GENESIS_MARKER`]; every later
    /// packet to the digest of the current last packet, computed over
    /// that packet's current field values. The packet is fully linked
    /// before it becomes visible in the chain.
    pub fn append(&mut self, mut packet: Packet) {
        match self.packets.last() {
            Some(last) => packet.set_prev_hash(last.digest()),
            None => packet.set_prev_hash(GENESIS_MARKER),
        }

        if packet.session_id != self.session_id {
            warn!(
                chain_session = %self.session_id,
                packet_session = %packet.session_id,
                "appending packet with mismatched session id"
            );
        }

        debug!(
            session = %self.session_id,
            index = self.packets.len(),
            prev_hash = %packet.prev_hash(),
            "packet appended"
        );
        self.packets.push(packet);
    }

    /// Scan the chain and report where it is inconsistent, if anywhere.
    ///
    /// Pure query: recomputes every predecessor digest from current
    /// field values and compares against the stored commitments. An
    /// empty chain is trivially consistent.
    pub fn verify_report(&self) -> Result<(), ChainError> {
        let Some(first) = self.packets.first() else {
            return Ok(());
        };

        if first.prev_hash() != GENESIS_MARKER {
            warn!(session = %self.session_id, "genesis packet carries a foreign prev_hash");
            return Err(ChainError::GenesisMismatch);
        }

        for index in 1..self.packets.len() {
            let expected = self.packets[index - 1].digest();
            if !constant_time_eq(self.packets[index].prev_hash(), &expected) {
                warn!(session = %self.session_id, index, "chain link broken");
                return Err(ChainError::BrokenLink { index });
            }
        }

        Ok(())
    }

    /// Whether every stored link matches the recomputed digest of its
    /// predecessor. Broken-ness is a normal outcome, not an error;
    /// callers wanting the break location use
    /// [`verify_report`](Self::verify_report).
    pub fn verify(&self) -> bool {
        self.verify_report().is_ok()
    }

    /// Number of packets in the chain.
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// Whether the chain holds no packets.
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Packet at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Packet> {
        self.packets.get(index)
    }

    /// Mutable access to a stored packet.
    ///
    /// Digests are recomputed on demand, so an edit to a hashed field
    /// made through this handle shows up in the next `verify` scan —
    /// except on the terminal packet, which no successor commits to.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Packet> {
        self.packets.get_mut(index)
    }

    /// The current last packet, if any.
    pub fn head(&self) -> Option<&Packet> {
        self.packets.last()
    }

    /// Iterate over the packets in append order.
    pub fn iter(&self) -> slice::Iter<'_, Packet> {
        self.packets.iter()
    }
}

impl Index<usize> for IntegrityChain {
    type Output = Packet;

    fn index(&self, index: usize) -> &Packet {
        &self.packets[index]
    }
}

impl<'a> IntoIterator for &'a IntegrityChain {
    type Item = &'a Packet;
    type IntoIter = slice::Iter<'a, Packet>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chain_verifies() {
        let chain = IntegrityChain::new("S1");
        assert!(chain.is_empty());
        assert!(chain.verify());
        assert!(chain.verify_report().is_ok());
    }

    #[test]
    fn test_two_packet_scenario() {
        let mut chain = IntegrityChain::new("S1");
        chain.append(Packet::new(b"A".to_vec(), 100, "S1"));
        chain.append(Packet::new(b"B".to_vec(), 101, "S1"));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].prev_hash(), GENESIS_MARKER);
        assert_eq!(chain[1].prev_hash(), chain[0].digest());
        assert!(chain.verify());
    }

    #[test]
    fn test_append_links_to_current_head() {
        let mut chain = IntegrityChain::new("S1");
        for i in 0..5 {
            chain.append(Packet::new(vec![i as u8], 100 + i, "S1"));
        }
        assert!(chain.verify());
        for i in 1..5usize {
            assert_eq!(chain[i].prev_hash(), chain[i - 1].digest());
        }
    }

    #[test]
    fn test_broken_link_reports_index() {
        let mut chain = IntegrityChain::new("S1");
        chain.append(Packet::new(b"A".to_vec(), 100, "S1"));
        chain.append(Packet::new(b"B".to_vec(), 101, "S1"));
        chain.append(Packet::new(b"C".to_vec(), 102, "S1"));

        chain.get_mut(1).unwrap().data = b"tampered".to_vec();

        assert!(!chain.verify());
        assert_eq!(
            chain.verify_report(),
            Err(ChainError::BrokenLink { index: 2 })
        );
    }

    #[test]
    fn test_verify_is_a_pure_query() {
        let mut chain = IntegrityChain::new("S1");
        chain.append(Packet::new(b"A".to_vec(), 100, "S1"));
        chain.append(Packet::new(b"B".to_vec(), 101, "S1"));

        assert!(chain.verify());
        assert!(chain.verify());
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[1].prev_hash(), chain[0].digest());
    }

    #[test]
    fn test_head_and_iteration() {
        let mut chain = IntegrityChain::new("S1");
        assert!(chain.head().is_none());

        chain.append(Packet::new(b"A".to_vec(), 100, "S1"));
        chain.append(Packet::new(b"B".to_vec(), 101, "S1"));

        assert_eq!(chain.head().unwrap().data, b"B".to_vec());
        let payloads: Vec<&[u8]> = chain.iter().map(|p| p.data.as_slice()).collect();
        assert_eq!(payloads, vec![b"A".as_slice(), b"B".as_slice()]);
        assert_eq!((&chain).into_iter().count(), 2);
    }

    #[test]
    fn test_genesis_marker_required() {
        let mut chain = IntegrityChain::new("S1");
        let mut packet = Packet::new(b"A".to_vec(), 100, "S1");
        // Pre-linked packet smuggled past the genesis step: append
        // cannot overwrite the existing commitment.
        packet.set_prev_hash("not-the-genesis-marker");
        chain.append(packet);

        assert_eq!(chain.verify_report(), Err(ChainError::GenesisMismatch));
        assert!(!chain.verify());
    }
}
