//! Authentication primitives for Tideline.
//!
//! This crate provides:
//! - Ed25519 identity keypairs and shareable peer IDs
//! - Signing and verification of `"{timestamp}:{nonce}"` challenges
//! - A nonce guard for callers that enforce challenge freshness
//!
//! # Design
//!
//! The authenticator itself is stateless: signing and verification are
//! pure functions of their inputs and the key, and the same message
//! encoding is used on both sides. Freshness policy (how old a
//! timestamp may be, which nonces have been consumed) belongs to the
//! caller, who injects a [`NonceGuard`] where replay of a valid
//! challenge must be rejected.

#![forbid(unsafe_code)]

pub mod challenge;
pub mod identity;
pub mod nonce;

pub use challenge::{challenge_message, SIGNATURE_LEN};
pub use identity::{AuthError, IdentityKeypair, PeerId, PublicIdentity};
pub use nonce::{random_nonce, NonceGuard};
