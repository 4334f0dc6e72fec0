//! Error types for the locker facade.

use locker_core::CryptoError;
use locker_store::StoreError;
use thiserror::Error;

/// Errors that can occur during locker operations.
#[derive(Debug, Error)]
pub enum LockerError {
    /// Cryptographic or input error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The session holds no key: it was never unlocked, or it was closed.
    #[error("locker is locked")]
    Locked,

    /// Unlock was requested while a key is already held.
    #[error("locker is already unlocked")]
    AlreadyUnlocked,
}

impl LockerError {
    /// True for a failed AEAD verification (wrong password or corrupted data).
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, LockerError::Crypto(e) if e.is_authentication_failure())
    }

    /// True for input rejected before any cryptographic call.
    pub fn is_input_validation(&self) -> bool {
        matches!(self, LockerError::Crypto(CryptoError::InputValidation(_)))
    }
}

/// Result type for locker operations.
pub type Result<T> = std::result::Result<T, LockerError>;
