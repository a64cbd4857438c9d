//! Timestamped challenge signing and verification.
//!
//! Both peers encode the challenge identically: the decimal timestamp
//! and the nonce joined by a colon, as UTF-8. The signer proves key
//! possession for that exact `(timestamp, nonce)` pair; the verifier
//! reconstructs the message and checks the signature. Neither side
//! enforces a freshness window here — that policy sits with the
//! caller, typically backed by a [`NonceGuard`].
//!
//! [`NonceGuard`]: crate::nonce::NonceGuard

use ed25519_dalek::{Signature, Signer, Verifier};

use crate::identity::{AuthError, IdentityKeypair, PublicIdentity};

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Canonical challenge encoding: `"{timestamp}:{nonce}"` as UTF-8.
pub fn challenge_message(timestamp: i64, nonce: &str) -> Vec<u8> {
    format!("{timestamp}:{nonce}").into_bytes()
}

impl IdentityKeypair {
    /// Sign a `(timestamp, nonce)` challenge.
    ///
    /// Pure function of the inputs and the private key.
    pub fn sign_challenge(&self, timestamp: i64, nonce: &str) -> [u8; SIGNATURE_LEN] {
        self.signing_key()
            .sign(&challenge_message(timestamp, nonce))
            .to_bytes()
    }
}

impl PublicIdentity {
    /// Check a challenge signature, separating caller bugs from
    /// verification failure.
    ///
    /// `Ok(false)` means the signature does not match this key and
    /// challenge; `Err(MalformedSignature)` means the bytes are not a
    /// signature at all.
    pub fn try_verify_challenge(
        &self,
        timestamp: i64,
        nonce: &str,
        signature: &[u8],
    ) -> Result<bool, AuthError> {
        let signature = Signature::from_slice(signature)
            .map_err(|_| AuthError::MalformedSignature(signature.len()))?;

        Ok(self
            .verifying_key()
            .verify(&challenge_message(timestamp, nonce), &signature)
            .is_ok())
    }

    /// Check a challenge signature.
    ///
    /// Never errors: malformed signature bytes, an altered timestamp
    /// or nonce, and a mismatched key all yield `false`.
    pub fn verify_challenge(&self, timestamp: i64, nonce: &str, signature: &[u8]) -> bool {
        self.try_verify_challenge(timestamp, nonce, signature)
            .unwrap_or(false)
    }
}
