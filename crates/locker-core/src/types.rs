//! Strong type definitions for locker inputs.
//!
//! Inputs are validated at construction so that nothing downstream ever
//! sees an empty workspace id or password.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, Result};

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Opaque identifier of a workspace.
///
/// Must stay constant for the lifetime of any ciphertext derived under it:
/// a different id means a different salt, and old payloads become unreadable.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Create a workspace id, rejecting empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CryptoError::InputValidation(
                "workspace id cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkspaceId({})", self.0)
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WorkspaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkspaceId {
    type Error = CryptoError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for WorkspaceId {
    type Error = CryptoError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<WorkspaceId> for String {
    fn from(id: WorkspaceId) -> Self {
        id.0
    }
}

/// A user-supplied password.
///
/// Held only transiently; zeroized on drop and redacted from `Debug`.
/// Deliberately implements neither `Display` nor `Serialize`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    /// Wrap a password, rejecting the empty string.
    pub fn new(password: impl Into<String>) -> Result<Self> {
        let password = password.into();
        if password.is_empty() {
            return Err(CryptoError::InputValidation(
                "password cannot be empty".to_string(),
            ));
        }
        Ok(Self(password))
    }

    /// The UTF-8 bytes fed into key derivation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl TryFrom<&str> for Password {
    type Error = CryptoError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

/// PBKDF2 stretch factor.
///
/// Must match between encryption and decryption of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Iterations(u32);

impl Iterations {
    /// The default stretch factor (100,000).
    pub const DEFAULT: Self = Self(DEFAULT_ITERATIONS);

    /// Create an iteration count; zero is rejected.
    pub fn new(count: u32) -> Result<Self> {
        if count == 0 {
            return Err(CryptoError::InputValidation(
                "iteration count must be at least 1".to_string(),
            ));
        }
        Ok(Self(count))
    }

    /// Get the raw count.
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Iterations {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Iterations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Iterations {
    type Error = CryptoError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Iterations> for u32 {
    fn from(it: Iterations) -> Self {
        it.0
    }
}
