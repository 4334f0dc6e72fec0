//! Error types for the locker core.

use thiserror::Error;

/// Errors that can occur during salt derivation, key derivation or
/// authenticated encryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The host cannot provide a cryptographic primitive (e.g. the OS RNG).
    ///
    /// Not recoverable by retrying.
    #[error("cryptographic environment unavailable: {0}")]
    EnvironmentUnavailable(String),

    /// AEAD tag verification failed.
    ///
    /// Raised for a wrong key and for corrupted or tampered data alike; the
    /// two cases are indistinguishable by construction.
    #[error("wrong password or corrupted data")]
    AuthenticationFailure,

    /// Missing or malformed input, rejected before any cryptographic call.
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// The key was derived in non-extractable form.
    #[error("key material is not extractable")]
    NotExtractable,

    /// Record serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CryptoError {
    /// Returns true if this is an AEAD verification failure.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, CryptoError::AuthenticationFailure)
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(e: serde_json::Error) -> Self {
        CryptoError::Serialization(e.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
