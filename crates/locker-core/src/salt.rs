//! Workspace salt derivation.
//!
//! The salt is SHA-256 over `"ws:" || workspace_id`. It is not secret and is
//! never persisted; it is recomputed whenever a key is derived.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::types::WorkspaceId;

/// Domain prefix for V1 salts.
pub const SALT_DOMAIN_V1: &[u8] = b"ws:";

/// Salt derivation scheme, recorded next to each persisted record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaltVersion {
    /// SHA-256("ws:" + workspace id).
    #[default]
    #[serde(rename = "v1")]
    V1,
}

/// A 32-byte workspace salt.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Salt([u8; 32]);

impl Salt {
    /// Derive the salt for a workspace under the given scheme.
    pub fn derive(workspace_id: &WorkspaceId, version: SaltVersion) -> Self {
        match version {
            SaltVersion::V1 => {
                let mut hasher = Sha256::new();
                hasher.update(SALT_DOMAIN_V1);
                hasher.update(workspace_id.as_str().as_bytes());
                Self(hasher.finalize().into())
            }
        }
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Salt {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Derive the current-scheme salt for a workspace.
pub fn derive_salt(workspace_id: &WorkspaceId) -> Salt {
    Salt::derive(workspace_id, SaltVersion::default())
}
