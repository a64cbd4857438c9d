//! Common error types for Tideline.

use thiserror::Error;

/// Result type alias using Tideline's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Tideline operations.
///
/// Component crates define their own narrow error enums and convert into
/// this type at the boundary where a caller composes both mechanisms.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file, pipe, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cryptographic operation failed
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Authentication failed
    #[error("authentication error: {0}")]
    Auth(String),

    /// Protocol error
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a crypto error from any displayable type.
    pub fn crypto(msg: impl std::fmt::Display) -> Self {
        Self::Crypto(msg.to_string())
    }

    /// Create an auth error from any displayable type.
    pub fn auth(msg: impl std::fmt::Display) -> Self {
        Self::Auth(msg.to_string())
    }

    /// Create a protocol error from any displayable type.
    pub fn protocol(msg: impl std::fmt::Display) -> Self {
        Self::Protocol(msg.to_string())
    }

    /// Create an internal error from any displayable type.
    pub fn internal(msg: impl std::fmt::Display) -> Self {
        Self::Internal(msg.to_string())
    }
}
