//! Ed25519 identity keys and peer IDs.
//!
//! A **peer ID** is the base64url-encoded Ed25519 public key (32 bytes
//! → 43 characters): a stable, shareable identity for one session peer.
//!
//! # Example
//!
//! ```
//! use tideline_crypto::identity::IdentityKeypair;
//!
//! let keypair = IdentityKeypair::generate();
//! let signature = keypair.sign_challenge(1_700_000_000, "fresh-nonce");
//! assert!(keypair.public().verify_challenge(1_700_000_000, "fresh-nonce", &signature));
//! ```

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroize;

/// Misuse errors, distinct from a failed verification.
///
/// A signature that simply does not match yields `false` from the
/// verification APIs; these errors mean the caller handed the
/// component bytes that cannot be interpreted at all.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("malformed signature: expected 64 bytes, got {0}")]
    MalformedSignature(usize),
}

impl From<AuthError> for tideline_common::Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidKeyFormat(_) => Self::crypto(err),
            AuthError::MalformedSignature(_) => Self::auth(err),
        }
    }
}

/// Peer ID: base64url-encoded Ed25519 public key.
///
/// 32 bytes encoded as 43 characters (no padding).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(String);

impl PeerId {
    /// Create a peer ID from raw public key bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Parse a peer ID from its string representation.
    pub fn parse(s: &str) -> Result<Self, AuthError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|e| AuthError::InvalidKeyFormat(format!("invalid base64url: {e}")))?;

        if bytes.len() != 32 {
            return Err(AuthError::InvalidKeyFormat(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self(s.to_string()))
    }

    /// Get the raw public key bytes.
    pub fn to_bytes(&self) -> Result<[u8; 32], AuthError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(&self.0)
            .map_err(|e| AuthError::InvalidKeyFormat(format!("invalid base64url: {e}")))?;

        bytes
            .try_into()
            .map_err(|_| AuthError::InvalidKeyFormat("invalid key length".to_string()))
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.0)
    }
}

/// Ed25519 identity keypair.
///
/// Holds the signing key; the verifying half is derived on demand.
/// Generated fresh per session, never persisted by this crate.
pub struct IdentityKeypair {
    signing_key: SigningKey,
}

impl IdentityKeypair {
    /// Generate a new random keypair using the OS CSPRNG.
    ///
    /// Successive calls yield independent keypairs.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Create from raw signing key bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(bytes);
        Self { signing_key }
    }

    /// Create from a byte slice, zeroizing the intermediate copy.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AuthError> {
        if bytes.len() != 32 {
            return Err(AuthError::InvalidKeyFormat(format!(
                "expected 32 byte private key, got {}",
                bytes.len()
            )));
        }

        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(bytes);
        let keypair = Self::from_bytes(&key_bytes);
        key_bytes.zeroize();

        Ok(keypair)
    }

    /// Get the peer ID (base64url-encoded public key).
    pub fn peer_id(&self) -> PeerId {
        PeerId::from_bytes(self.signing_key.verifying_key().as_bytes())
    }

    /// Get the public half as a standalone verifier.
    pub fn public(&self) -> PublicIdentity {
        PublicIdentity {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Get the public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        *self.signing_key.verifying_key().as_bytes()
    }

    /// Get the private key bytes.
    ///
    /// # Security
    /// Handle with care! These bytes can recreate the identity.
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// Public identity (verifying key only).
///
/// The freely shareable half of a keypair, used by the peer checking a
/// challenge signature.
#[derive(Clone)]
pub struct PublicIdentity {
    verifying_key: VerifyingKey,
}

impl PublicIdentity {
    /// Create from raw public key bytes.
    ///
    /// Fails with [`AuthError::InvalidKeyFormat`] when the bytes are
    /// not a valid curve point.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, AuthError> {
        let verifying_key = VerifyingKey::from_bytes(bytes)
            .map_err(|e| AuthError::InvalidKeyFormat(e.to_string()))?;
        Ok(Self { verifying_key })
    }

    /// Create from an encoded peer ID.
    pub fn from_peer_id(peer_id: &PeerId) -> Result<Self, AuthError> {
        Self::from_bytes(&peer_id.to_bytes()?)
    }

    /// Get the peer ID for this identity.
    pub fn peer_id(&self) -> PeerId {
        PeerId::from_bytes(self.verifying_key.as_bytes())
    }

    /// Get the raw public key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.verifying_key.as_bytes()
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl fmt::Debug for PublicIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicIdentity({})", self.peer_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let keypair = IdentityKeypair::generate();
        let peer_id = keypair.peer_id();

        // Peer ID should be 43 characters (32 bytes base64url without padding)
        assert_eq!(peer_id.as_str().len(), 43);
        assert_ne!(keypair.private_key_bytes(), keypair.public_key_bytes());
    }

    #[test]
    fn test_successive_keypairs_are_independent() {
        let a = IdentityKeypair::generate();
        let b = IdentityKeypair::generate();
        assert_ne!(a.public_key_bytes(), b.public_key_bytes());
        assert_ne!(a.private_key_bytes(), b.private_key_bytes());
    }

    #[test]
    fn test_peer_id_round_trip() {
        let keypair = IdentityKeypair::generate();
        let peer_id = keypair.peer_id();

        let parsed = PeerId::parse(peer_id.as_str()).unwrap();
        assert_eq!(peer_id, parsed);

        let identity = PublicIdentity::from_peer_id(&parsed).unwrap();
        assert_eq!(identity.as_bytes(), &keypair.public_key_bytes());
    }

    #[test]
    fn test_peer_id_rejects_garbage() {
        assert!(PeerId::parse("not base64url!!").is_err());
        assert!(PeerId::parse("c2hvcnQ").is_err()); // decodes, wrong length
    }

    #[test]
    fn test_keypair_bytes_round_trip() {
        let keypair = IdentityKeypair::generate();
        let private_bytes = keypair.private_key_bytes();
        let public_bytes = keypair.public_key_bytes();

        let restored = IdentityKeypair::from_slice(&private_bytes).unwrap();
        assert_eq!(restored.public_key_bytes(), public_bytes);
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        assert!(IdentityKeypair::from_slice(&[0u8; 16]).is_err());
        assert!(IdentityKeypair::from_slice(&[]).is_err());
    }
}
