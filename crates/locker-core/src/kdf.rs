//! Password-based key derivation (PBKDF2-HMAC-SHA256).
//!
//! No key is ever stored, so derivation must be deterministic: the same
//! password, salt and iteration count always yield the same key bytes.
//! Cost grows linearly with the iteration count and no upper time bound is
//! enforced; callers should show a busy indicator rather than time out.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{CryptoError, Result};
use crate::salt::{Salt, SaltVersion};
use crate::types::{Iterations, Password, WorkspaceId};

/// Length of a derived key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Parameters needed to re-derive the key for a persisted payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// PBKDF2 iteration count.
    pub iterations: Iterations,
    /// Salt derivation scheme.
    pub salt_version: SaltVersion,
}

impl KdfParams {
    /// Current scheme with a custom iteration count.
    pub fn with_iterations(iterations: Iterations) -> Self {
        Self {
            iterations,
            salt_version: SaltVersion::default(),
        }
    }
}

/// A 256-bit AES-GCM key derived from a password.
///
/// Zeroized on drop; never serialized. Only extractable keys can export
/// their raw bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
    #[zeroize(skip)]
    extractable: bool,
}

impl DerivedKey {
    pub(crate) fn from_bytes(key: [u8; KEY_LENGTH], extractable: bool) -> Self {
        Self { key, extractable }
    }

    /// Whether the raw key bytes may be exported.
    pub fn is_extractable(&self) -> bool {
        self.extractable
    }

    /// Export the raw key as base64, for developer inspection only.
    pub fn export(&self) -> Result<Zeroizing<String>> {
        if !self.extractable {
            return Err(CryptoError::NotExtractable);
        }
        Ok(Zeroizing::new(STANDARD.encode(self.key)))
    }

    /// Compare key material. Not constant-time; for tests and
    /// interoperability checks only.
    pub fn same_material(&self, other: &DerivedKey) -> bool {
        self.key == other.key
    }

    pub(crate) fn material(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .field("extractable", &self.extractable)
            .finish()
    }
}

/// Stretch a password and salt into a key.
pub fn derive_key(
    password: &Password,
    salt: &Salt,
    iterations: Iterations,
    extractable: bool,
) -> Result<DerivedKey> {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        iterations.get(),
        &mut key,
    );
    let derived = DerivedKey::from_bytes(key, extractable);
    key.zeroize();
    Ok(derived)
}

/// Derive a key for a workspace under the given parameters.
pub fn derive_with_params(
    password: &Password,
    workspace_id: &WorkspaceId,
    params: &KdfParams,
    extractable: bool,
) -> Result<DerivedKey> {
    let salt = Salt::derive(workspace_id, params.salt_version);
    derive_key(password, &salt, params.iterations, extractable)
}

/// Derive the session key for a workspace (extractable form).
pub fn derive_session_key(
    password: &Password,
    workspace_id: &WorkspaceId,
    iterations: Iterations,
) -> Result<DerivedKey> {
    derive_with_params(
        password,
        workspace_id,
        &KdfParams::with_iterations(iterations),
        true,
    )
}
