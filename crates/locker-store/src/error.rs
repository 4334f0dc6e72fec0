//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,

    /// Record serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<locker_core::CryptoError> for StoreError {
    fn from(e: locker_core::CryptoError) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
