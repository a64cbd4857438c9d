//! Tamper-evident session packet log.
//!
//! This crate provides:
//! - `Packet`: one unit of application data, carrying a write-once
//!   commitment to the digest of its chain predecessor
//! - `IntegrityChain`: an append-only, hash-chained log of packets
//!   for one session, with an on-demand verification scan
//!
//! # Design
//!
//! Packet digests are never cached. `verify` recomputes every
//! predecessor digest from the packet's current field values, so any
//! edit to a hashed field of a non-terminal packet breaks the link its
//! successor stored at append time. The terminal packet has no
//! successor committing to it; consumers that need the head covered
//! must append a closing packet (or anchor the head digest externally)
//! before trusting a read.
//!
//! Replay of identical payloads is not detected here: packets carry no
//! unique identifier, and deduplication belongs to the transport layer.

#![forbid(unsafe_code)]

pub mod chain;
pub mod packet;

pub use chain::{ChainError, IntegrityChain};
pub use packet::{Packet, GENESIS_MARKER};
