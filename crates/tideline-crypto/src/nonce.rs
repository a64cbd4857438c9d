//! Nonce generation and replay guarding.
//!
//! The authenticator accepts any `(timestamp, nonce)` pair; rejecting a
//! challenge that was already accepted is the caller's policy. Callers
//! that want it inject a [`NonceGuard`]: a consumed-nonce set with a
//! bounded time window, so the set cannot grow without limit.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::RngCore;

/// Generate a fresh random nonce: 16 bytes from the OS CSPRNG, hex-encoded.
pub fn random_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Thread-safe consumed-nonce set with TTL-based expiry.
///
/// A nonce outside the time window is forgotten, matching the freshness
/// window the caller enforces on the challenge timestamp.
pub struct NonceGuard {
    /// Map of nonce -> expiry time.
    nonces: Mutex<HashMap<String, Instant>>,
    /// Time-to-live for nonces.
    ttl: Duration,
}

impl NonceGuard {
    /// Create a new guard with the given nonce time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self {
            nonces: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Check whether a nonce is fresh, consuming it if so.
    ///
    /// Returns `true` if the nonce was not seen within the window (it
    /// is now recorded), `false` if it was already consumed.
    pub fn check_and_store(&self, nonce: &str) -> bool {
        let mut nonces = match self.nonces.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();

        // Lazy cleanup of expired nonces.
        nonces.retain(|_, expiry| *expiry > now);

        if nonces.contains_key(nonce) {
            return false;
        }

        nonces.insert(nonce.to_string(), now + self.ttl);
        true
    }

    /// Current number of tracked nonces (for monitoring).
    pub fn len(&self) -> usize {
        match self.nonces.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether no nonces are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Force cleanup of expired nonces.
    pub fn cleanup(&self) {
        let mut nonces = match self.nonces.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        nonces.retain(|_, expiry| *expiry > now);
    }
}
